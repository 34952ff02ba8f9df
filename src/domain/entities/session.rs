#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
}

/// Who is using the dashboard. Passed explicitly to the pages; nothing else
/// keeps login state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    SignedOut,
    SignedIn(User),
}

impl Session {
    pub fn sign_in(&mut self, user: User) {
        *self = Session::SignedIn(user);
    }

    pub fn sign_out(&mut self) {
        *self = Session::SignedOut;
    }

    pub fn current_user(&self) -> Option<&User> {
        match self {
            Session::SignedIn(user) => Some(user),
            Session::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }
}
