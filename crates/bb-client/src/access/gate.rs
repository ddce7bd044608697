use bb_types::{auth::AccountType, records::User};

use crate::session::Session;

/// Account types a page admits. An empty set admits any valid session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleGate {
    required: Vec<AccountType>,
}

impl RoleGate {
    /// Any authenticated account.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn only(roles: impl IntoIterator<Item = AccountType>) -> Self {
        let mut required: Vec<AccountType> = Vec::new();
        for role in roles {
            if !required.contains(&role) {
                required.push(role);
            }
        }
        Self { required }
    }

    pub fn admin() -> Self {
        Self::only([AccountType::Admin])
    }

    pub fn staff() -> Self {
        Self::only([AccountType::Admin, AccountType::Staff])
    }

    pub fn required(&self) -> &[AccountType] {
        &self.required
    }

    pub fn permits(&self, account_type: AccountType) -> bool {
        self.required.is_empty() || self.required.contains(&account_type)
    }

    pub fn authorize(&self, session: &Session) -> bool {
        self.permits(session.account_type())
    }

    /// Gate on a freshly fetched user record instead of local claims.
    pub fn authorize_user(&self, user: &User) -> bool {
        match user.account_type {
            Some(account_type) => self.permits(account_type),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_gate_admits_everyone() {
        let gate = RoleGate::any();
        for role in AccountType::ALL {
            assert!(gate.permits(role));
        }
    }

    #[test]
    fn restricted_gates() {
        assert!(RoleGate::admin().permits(AccountType::Admin));
        assert!(!RoleGate::admin().permits(AccountType::Staff));
        assert!(RoleGate::staff().permits(AccountType::Staff));
        assert!(!RoleGate::staff().permits(AccountType::Parent));

        let gate = RoleGate::only([AccountType::Parent, AccountType::Parent]);
        assert_eq!(gate.required(), &[AccountType::Parent]);
    }

    #[test]
    fn user_without_account_type_is_denied() {
        let user = User::default();
        assert!(!RoleGate::any().authorize_user(&user));

        let user = User {
            account_type: Some(AccountType::Staff),
            ..Default::default()
        };
        assert!(RoleGate::staff().authorize_user(&user));
    }
}
