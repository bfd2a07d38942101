//! Screen navigation as an explicit state machine.

use serde::{Deserialize, Serialize};

/// Screens reachable once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Main menu
    Menu,
    /// Service progress of the current job
    Tracking,
    /// Past services
    History,
    /// FAQ
    Knowledge,
    /// Contact details
    Contact,
}

impl Screen {
    /// Screens listed on the main menu, in display order.
    pub const MENU_ITEMS: [Screen; 4] = [
        Screen::Tracking,
        Screen::History,
        Screen::Knowledge,
        Screen::Contact,
    ];

    /// Screen title.
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Menu => "Menu",
            Screen::Tracking => "Service Tracking",
            Screen::History => "Service History",
            Screen::Knowledge => "Knowledge Base",
            Screen::Contact => "Contact Us",
        }
    }
}

/// Screens shown while signed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScreen {
    /// Sign in form
    SignIn,
    /// Registration form
    SignUp,
    /// Password reset
    ForgotPassword,
}

/// Navigation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// The move is not allowed from the current screen
    #[error("Cannot go from {from:?} to {to:?}")]
    NotAllowed {
        /// Current screen
        from: Location,
        /// Requested screen
        to: Location,
    },

    /// Already on the main menu
    #[error("Nothing to go back to")]
    AtRoot,
}

/// Where the user currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "area", content = "screen")]
pub enum Location {
    /// Signed out, on an auth screen
    Auth(AuthScreen),
    /// Signed in, on an app screen
    App(Screen),
}

/// Navigation state owned by the view layer.
///
/// Menu is the hub: feature screens are opened from it and return to it.
/// Auth screens link to each other; signing in lands on the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    location: Location,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Start on the sign-in screen.
    pub fn new() -> Self {
        Self {
            location: Location::Auth(AuthScreen::SignIn),
        }
    }

    /// Current location.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Switch between auth screens.
    pub fn show_auth(&mut self, screen: AuthScreen) -> Result<(), NavigationError> {
        match self.location {
            Location::Auth(_) => {
                self.location = Location::Auth(screen);
                Ok(())
            }
            from => Err(NavigationError::NotAllowed {
                from,
                to: Location::Auth(screen),
            }),
        }
    }

    /// A sign-in succeeded.
    pub fn signed_in(&mut self) {
        self.location = Location::App(Screen::Menu);
    }

    /// The user signed out.
    pub fn signed_out(&mut self) {
        self.location = Location::Auth(AuthScreen::SignIn);
    }

    /// Open a feature screen from the menu.
    pub fn open(&mut self, screen: Screen) -> Result<(), NavigationError> {
        match self.location {
            Location::App(Screen::Menu) if screen != Screen::Menu => {
                self.location = Location::App(screen);
                Ok(())
            }
            from => Err(NavigationError::NotAllowed {
                from,
                to: Location::App(screen),
            }),
        }
    }

    /// Go back to the menu (or from sign-up / reset back to sign-in).
    pub fn back(&mut self) -> Result<(), NavigationError> {
        match self.location {
            Location::App(Screen::Menu) | Location::Auth(AuthScreen::SignIn) => {
                Err(NavigationError::AtRoot)
            }
            Location::App(_) => {
                self.location = Location::App(Screen::Menu);
                Ok(())
            }
            Location::Auth(_) => {
                self.location = Location::Auth(AuthScreen::SignIn);
                Ok(())
            }
        }
    }
}
