// src/model/role.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stage of the four-echelon distribution chain.
///
/// Declaration order is chain order (customer side first), so `Ord` and
/// [`Role::ALL`] both walk from the retailer up to the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Retailer,
    Wholesaler,
    Distributor,
    Factory,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Retailer,
        Role::Wholesaler,
        Role::Distributor,
        Role::Factory,
    ];

    /// Position in the chain, 0 for the retailer.
    pub fn index(self) -> usize {
        match self {
            Role::Retailer => 0,
            Role::Wholesaler => 1,
            Role::Distributor => 2,
            Role::Factory => 3,
        }
    }

    /// The supplier this role orders from. The factory has none.
    pub fn upstream(self) -> Option<Role> {
        match self {
            Role::Retailer => Some(Role::Wholesaler),
            Role::Wholesaler => Some(Role::Distributor),
            Role::Distributor => Some(Role::Factory),
            Role::Factory => None,
        }
    }

    /// The customer this role ships to. The retailer's customer is the
    /// external market, so it has none.
    pub fn downstream(self) -> Option<Role> {
        match self {
            Role::Retailer => None,
            Role::Wholesaler => Some(Role::Retailer),
            Role::Distributor => Some(Role::Wholesaler),
            Role::Factory => Some(Role::Distributor),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Retailer => "retailer",
            Role::Wholesaler => "wholesaler",
            Role::Distributor => "distributor",
            Role::Factory => "factory",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
