//! The account menu in the session header.

use interview_session_types::UserProfile;
use serde::Serialize;
use std::fmt;

pub type MenuCallback = Box<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuEntry {
    SignIn,
    /// The button that opens the menu, labelled with the user's name.
    Trigger { name: String },
    /// Read-only line showing the signed-in address.
    Email { email: String },
    SignOut,
}

impl MenuEntry {
    pub fn is_actionable(&self) -> bool {
        matches!(self, MenuEntry::SignIn | MenuEntry::SignOut)
    }
}

/// Maps the current user to menu entries and routes activations to the
/// sign-in and sign-out callbacks.
pub struct AccountMenu {
    user: Option<UserProfile>,
    on_sign_in: MenuCallback,
    on_sign_out: MenuCallback,
}

impl fmt::Debug for AccountMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountMenu")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl AccountMenu {
    pub fn new(
        user: Option<UserProfile>,
        on_sign_in: impl Fn() + Send + Sync + 'static,
        on_sign_out: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            user,
            on_sign_in: Box::new(on_sign_in),
            on_sign_out: Box::new(on_sign_out),
        }
    }

    pub fn set_user(&mut self, user: Option<UserProfile>) {
        self.user = user;
    }

    pub fn entries(&self) -> Vec<MenuEntry> {
        match &self.user {
            None => vec![MenuEntry::SignIn],
            Some(user) => vec![
                MenuEntry::Trigger {
                    name: user.name.clone(),
                },
                MenuEntry::Email {
                    email: user.email.clone(),
                },
                MenuEntry::SignOut,
            ],
        }
    }

    /// Run the callback behind `entry`. Returns false when the entry is
    /// not actionable or does not belong to the current menu.
    pub fn activate(&self, entry: &MenuEntry) -> bool {
        let callback = match (entry, &self.user) {
            (MenuEntry::SignIn, None) => &self.on_sign_in,
            (MenuEntry::SignOut, Some(_)) => &self.on_sign_out,
            _ => return false,
        };
        tracing::info!("account menu: {:?}", entry);
        callback();
        true
    }
}
