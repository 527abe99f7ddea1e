//! # Business Context
//!
//! Everything the sale pipeline needs to know about the business, resolved
//! once per request and passed by reference afterwards.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BusinessContext                                                        │
//! │  ├── business_id                                                        │
//! │  ├── owner_id ─────────────────┐                                        │
//! │  ├── attendants: [user_id]     ├──► authorize(acting_user)             │
//! │  └── alerts                    │                                        │
//! │      ├── low_stock      ─┐     │                                        │
//! │      ├── out_of_stock   ─┼─────┴──► alert_target(event kind)           │
//! │      └── push_token     ─┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::StockEventKind;

/// The owner's stock alert preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSettings {
    pub low_stock: bool,
    pub out_of_stock: bool,
    /// Registered device; alerts are dropped without one.
    pub push_token: Option<String>,
}

/// A resolved business, its staff, and its alert routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessContext {
    pub business_id: String,
    pub owner_id: String,
    /// Active attendants only.
    pub attendants: Vec<String>,
    pub alerts: AlertSettings,
}

impl BusinessContext {
    /// Checks that `user_id` may record sales for this business.
    ///
    /// The owner is always allowed; anyone else must be an active attendant.
    pub fn authorize(&self, user_id: &str) -> CoreResult<()> {
        if self.owner_id == user_id || self.attendants.iter().any(|a| a == user_id) {
            return Ok(());
        }

        Err(CoreError::Unauthorized {
            user_id: user_id.to_string(),
            business_id: self.business_id.clone(),
        })
    }

    /// Returns the push token an event of `kind` should go to, if the owner
    /// opted in and registered a device.
    pub fn alert_target(&self, kind: StockEventKind) -> Option<&str> {
        let enabled = match kind {
            StockEventKind::Low => self.alerts.low_stock,
            StockEventKind::OutOfStock => self.alerts.out_of_stock,
        };

        if !enabled {
            return None;
        }

        self.alerts
            .push_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }
}
