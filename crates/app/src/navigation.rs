//! Screens a flow can hand control to

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    SignIn,
    SignUp,
    Home,
    Appointment,
    Status,
    Profile,
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignIn => write!(f, "/Signin"),
            Self::SignUp => write!(f, "/CreateAccount"),
            Self::Home => write!(f, "/Home"),
            Self::Appointment => write!(f, "/Appointment"),
            Self::Status => write!(f, "/Status"),
            Self::Profile => write!(f, "/Profile"),
        }
    }
}
