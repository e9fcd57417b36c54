use cardmatch_core::KeyValueStore;
use gloo::storage::{LocalStorage, Storage};

/// Raw string preferences kept in the browser's `localStorage`.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LocalStorageStore;

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::error!("Could not read {} from local storage: {:?}", key, err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(err) = LocalStorage::raw().set_item(key, value) {
            log::error!("Could not save {} to local storage: {:?}", key, err);
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use cardmatch_core::UserDataService;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn user_id_persists_in_local_storage() {
        let mut service = UserDataService::new(LocalStorageStore);
        service.set_user_id("browser-user");

        let reloaded = UserDataService::new(LocalStorageStore);
        assert_eq!(reloaded.user_id().as_deref(), Some("browser-user"));
        assert!(!reloaded.needs_registration());
    }
}
