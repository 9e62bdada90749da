//! The wallet — single source of truth for the player's coin balance.
//!
//! Multiple engines mutate it (harvest credit, seed/water/boost debit,
//! sale proceeds, upgrade and rite purchases); only the owning
//! `FarmEngine` ever holds a mutable handle, so each credit/debit is a
//! plain read-modify-write. Observers get the new balance after every
//! successful mutation — the UI refresh hook.

pub const DEFAULT_BALANCE: u64 = 100;

type Observer = Box<dyn FnMut(u64) + Send>;

pub struct Wallet {
    balance: u64,
    observers: Vec<Observer>,
}

impl Wallet {
    pub fn new(balance: u64) -> Self {
        Self {
            balance,
            observers: Vec::new(),
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Register a change observer. Called with the new balance after
    /// every successful credit or debit.
    pub fn subscribe(&mut self, observer: impl FnMut(u64) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Add coins. A zero amount is a no-op and notifies nobody.
    pub fn credit(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.balance += amount;
        self.notify();
    }

    /// Remove coins. Fails without effect if the balance is short.
    /// A zero amount trivially succeeds without notifying.
    pub fn debit(&mut self, amount: u64) -> bool {
        if amount == 0 {
            return true;
        }
        if self.balance < amount {
            return false;
        }
        self.balance -= amount;
        self.notify();
        true
    }

    fn notify(&mut self) {
        let balance = self.balance;
        for observer in &mut self.observers {
            observer(balance);
        }
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("balance", &self.balance)
            .field("observers", &self.observers.len())
            .finish()
    }
}
