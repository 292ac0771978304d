use std::collections::HashMap;

use bcrypt::BcryptError;

/// Granted authorities. Only CARD-OWNER may reach the card endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    CardOwner,
    NonOwner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CardOwner => "CARD-OWNER",
            Role::NonOwner => "NON-OWNER",
        }
    }
}

/// A single account in the directory. The password is held only as a bcrypt
/// hash computed at construction time.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub username: String,
    password_hash: String,
    pub roles: Vec<Role>,
}

impl UserAccount {
    fn new(username: &str, password: &str, roles: Vec<Role>, cost: u32) -> Result<Self, BcryptError> {
        Ok(Self {
            username: username.to_string(),
            password_hash: bcrypt::hash(password, cost)?,
            roles,
        })
    }
}

/// Immutable username-to-account map consulted on every request. There is no
/// registration or account mutation; the set is fixed at startup.
pub struct UserDirectory {
    accounts: HashMap<String, UserAccount>,
}

impl UserDirectory {
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|a| (a.username.clone(), a))
            .collect();
        Self { accounts }
    }

    /// The built-in accounts: two card owners plus one user with no card
    /// access at all. Every password is "1111".
    pub fn builtin_users(cost: u32) -> Result<Self, BcryptError> {
        Ok(Self::new(vec![
            UserAccount::new("ye1", "1111", vec![Role::CardOwner], cost)?,
            UserAccount::new("ye2", "1111", vec![Role::CardOwner], cost)?,
            UserAccount::new("hank-owns-no-cards", "1111", vec![Role::NonOwner], cost)?,
        ]))
    }

    /// Check credentials against the directory. Unknown usernames and wrong
    /// passwords both come back as None; the distinction only reaches the log.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&UserAccount> {
        let account = match self.accounts.get(username) {
            Some(account) => account,
            None => {
                tracing::warn!("Authentication failed: unknown user '{}'", username);
                return None;
            }
        };

        match bcrypt::verify(password, &account.password_hash) {
            Ok(true) => Some(account),
            Ok(false) => {
                tracing::warn!("Authentication failed: bad password for '{}'", username);
                None
            }
            Err(e) => {
                tracing::error!("Password verification error for '{}': {}", username, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the hashing in tests fast
    fn directory() -> UserDirectory {
        UserDirectory::builtin_users(4).expect("directory should build")
    }

    #[test]
    fn valid_credentials_resolve_the_account() {
        let directory = directory();
        let account = directory.authenticate("ye1", "1111").expect("ye1 should authenticate");
        assert_eq!(account.username, "ye1");
        assert_eq!(account.roles, vec![Role::CardOwner]);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let directory = directory();
        assert!(directory.authenticate("ye1", "9999").is_none());
    }

    #[test]
    fn unknown_user_is_rejected() {
        let directory = directory();
        assert!(directory.authenticate("nobody", "1111").is_none());
    }

    #[test]
    fn builtin_roles_are_assigned() {
        let directory = directory();

        let ye2 = directory.authenticate("ye2", "1111").expect("ye2 should authenticate");
        assert!(ye2.roles.contains(&Role::CardOwner));

        let hank = directory
            .authenticate("hank-owns-no-cards", "1111")
            .expect("hank should authenticate");
        assert!(hank.roles.contains(&Role::NonOwner));
        assert!(!hank.roles.contains(&Role::CardOwner));
    }

    #[test]
    fn role_names_match_granted_authorities() {
        assert_eq!(Role::CardOwner.as_str(), "CARD-OWNER");
        assert_eq!(Role::NonOwner.as_str(), "NON-OWNER");
    }
}
