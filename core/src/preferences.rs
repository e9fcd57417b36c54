use alloc::string::String;
use hashbrown::HashMap;

/// String key-value storage the front end persists preferences into.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Volatile store, used when no persistent storage is available.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.into(), value.into());
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// Player identity and referral data kept between sessions.
#[derive(Debug)]
pub struct UserDataService<S> {
    store: S,
}

impl<S: KeyValueStore> UserDataService<S> {
    pub const USER_ID_KEY: &'static str = "cardmatch:user-id";
    pub const FULL_REF_KEY: &'static str = "cardmatch:fullref";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn user_id(&self) -> Option<String> {
        self.store.get(Self::USER_ID_KEY)
    }

    pub fn set_user_id(&mut self, user_id: &str) {
        self.store.set(Self::USER_ID_KEY, user_id);
    }

    pub fn full_ref(&self) -> Option<String> {
        self.store.get(Self::FULL_REF_KEY)
    }

    pub fn set_full_ref(&mut self, full_ref: &str) {
        self.store.set(Self::FULL_REF_KEY, full_ref);
    }

    /// A missing id, or a provisional one containing `_`, sends the player to registration.
    pub fn needs_registration(&self) -> bool {
        self.user_id().is_none_or(|user_id| user_id.contains('_'))
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
