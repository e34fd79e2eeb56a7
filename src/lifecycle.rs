//! Shutdown of owned resources and termination signals

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tracing::{error, info};

use crate::error::PetError;

/// A resource released at shutdown
pub trait Dispose {
    fn name(&self) -> &'static str;

    fn dispose(&mut self) -> Result<(), PetError>;
}

/// Dispose every resource in order, continuing past failures.
/// Returns the errors that occurred.
pub fn release_all(resources: &mut [&mut dyn Dispose]) -> Vec<PetError> {
    let mut errors = Vec::new();
    for resource in resources.iter_mut() {
        let name = resource.name();
        match resource.dispose() {
            Ok(()) => info!(resource = name, "Released"),
            Err(e) => {
                error!(resource = name, error = %e, "Failed to release");
                errors.push(e);
            }
        }
    }
    errors
}

/// Flag raised by SIGINT/SIGTERM, polled by the UI loop
#[cfg(unix)]
pub fn termination_flag() -> anyhow::Result<Arc<AtomicBool>> {
    use anyhow::Context;
    use signal_hook::consts::{SIGINT, SIGTERM};

    let flag = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&flag))
            .context(format!("Failed to register handler for signal {signal}"))?;
    }
    Ok(flag)
}

#[cfg(not(unix))]
pub fn termination_flag() -> anyhow::Result<Arc<AtomicBool>> {
    Ok(Arc::new(AtomicBool::new(false)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Resource {
        name: &'static str,
        fail: bool,
        released: bool,
    }

    impl Resource {
        fn new(name: &'static str, fail: bool) -> Self {
            Self {
                name,
                fail,
                released: false,
            }
        }
    }

    impl Dispose for Resource {
        fn name(&self) -> &'static str {
            self.name
        }

        fn dispose(&mut self) -> Result<(), PetError> {
            if self.fail {
                return Err(PetError::Dispose {
                    resource: self.name,
                    reason: "busy".to_string(),
                });
            }
            self.released = true;
            Ok(())
        }
    }

    #[test]
    fn test_release_all_continues_after_failure() {
        let mut a = Resource::new("a", false);
        let mut b = Resource::new("b", true);
        let mut c = Resource::new("c", false);

        let mut resources: [&mut dyn Dispose; 3] = [&mut a, &mut b, &mut c];
        let errors = release_all(&mut resources);

        assert!(a.released);
        assert!(!b.released);
        assert!(c.released);
        assert_eq!(
            errors,
            vec![PetError::Dispose {
                resource: "b",
                reason: "busy".to_string()
            }]
        );
    }

    #[test]
    fn test_release_all_empty() {
        assert!(release_all(&mut Vec::new()).is_empty());
    }

    #[test]
    fn test_termination_flag_starts_lowered() {
        use std::sync::atomic::Ordering;

        let flag = termination_flag().unwrap();
        assert!(!flag.load(Ordering::Relaxed));
    }
}
