//! Set-membership authorization.

use std::collections::HashSet;

use super::AuthorizationChecker;

/// Grants exactly the attributes it was configured with.
#[derive(Debug, Clone, Default)]
pub struct RoleChecker {
    granted: HashSet<String>,
}

impl RoleChecker {
    pub fn new<I, S>(granted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            granted: granted.into_iter().map(Into::into).collect(),
        }
    }

    pub fn grant(&mut self, attribute: impl Into<String>) {
        self.granted.insert(attribute.into());
    }
}

impl AuthorizationChecker for RoleChecker {
    fn is_granted(&self, attribute: &str) -> bool {
        self.granted.contains(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_checker() {
        let mut checker = RoleChecker::new(["ROLE_ADMIN"]);
        assert!(checker.is_granted("ROLE_ADMIN"));
        assert!(!checker.is_granted("ROLE_SUPER_ADMIN"));

        checker.grant("ROLE_SUPER_ADMIN");
        assert!(checker.is_granted("ROLE_SUPER_ADMIN"));
    }
}
