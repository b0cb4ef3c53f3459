//! Reward sink

use parking_lot::RwLock;

/// Receives mission rewards. Calls are fire-and-forget.
pub trait RewardSink: Send + Sync {
    fn add_currency(&self, amount: u32);
    fn add_experience(&self, amount: u32);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Balance {
    currency: u64,
    experience: u64,
}

/// In-memory wallet
#[derive(Debug, Default)]
pub struct Wallet {
    balance: RwLock<Balance>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currency(&self) -> u64 {
        self.balance.read().currency
    }

    pub fn experience(&self) -> u64 {
        self.balance.read().experience
    }
}

impl RewardSink for Wallet {
    fn add_currency(&self, amount: u32) {
        let mut balance = self.balance.write();
        balance.currency = balance.currency.saturating_add(amount as u64);
        log::debug!("Wallet currency now {}", balance.currency);
    }

    fn add_experience(&self, amount: u32) {
        let mut balance = self.balance.write();
        balance.experience = balance.experience.saturating_add(amount as u64);
        log::debug!("Wallet experience now {}", balance.experience);
    }
}
