//! Home dashboard

use serde::Serialize;

use crate::identity::{load_identity, IdentityView};
use crate::App;

/// Link to an external health article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthTip {
    pub title: &'static str,
    pub url: &'static str,
}

pub const HEALTH_TIPS: &[HealthTip] = &[
    HealthTip {
        title: "5 Tips for a Healthy Lifestyle",
        url: "https://healthmatters.nyp.org/habits-for-a-healthy-new-year/",
    },
    HealthTip {
        title: "The Importance of Regular Checkups",
        url: "https://mypvhc.com/importance-regular-check-ups/",
    },
    HealthTip {
        title: "How to Manage Stress Effectively",
        url: "https://example.com/manage-stress",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeView {
    pub identity: IdentityView,
    pub tips: &'static [HealthTip],
}

impl HomeView {
    pub fn greeting(&self) -> String {
        format!("Good day, {}!", self.identity.name)
    }
}

pub async fn load_home(app: &App) -> HomeView {
    HomeView {
        identity: load_identity(app).await,
        tips: HEALTH_TIPS,
    }
}
