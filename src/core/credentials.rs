//! Admin gate for the quota check.

/// Static admin username/password pair, compared in plain text.
#[derive(Clone, Default)]
pub struct AdminCredentials {
    username: Option<String>,
    password: Option<String>,
}

impl AdminCredentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        AdminCredentials { username, password }
    }

    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// True only for the exact configured pair. Always false when either
    /// secret is missing.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => u == username && p == password,
            _ => false,
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminCredentials {
        AdminCredentials::new(Some("admin".to_string()), Some("s3cret".to_string()))
    }

    #[test]
    fn test_exact_pair_is_accepted() {
        assert!(admin().verify("admin", "s3cret"));
    }

    #[test]
    fn test_single_character_deviation_is_rejected() {
        let creds = admin();
        assert!(!creds.verify("admiN", "s3cret"));
        assert!(!creds.verify("admin", "s3creT"));
        assert!(!creds.verify("admin ", "s3cret"));
        assert!(!creds.verify("admin", "s3cre"));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn test_unconfigured_credentials_reject_everything() {
        let creds = AdminCredentials::new(Some("admin".to_string()), None);
        assert!(!creds.is_configured());
        assert!(!creds.verify("admin", ""));
        assert!(!AdminCredentials::default().verify("", ""));
    }

    #[test]
    fn test_debug_hides_password() {
        let out = format!("{:?}", admin());
        assert!(!out.contains("s3cret"));
    }
}
