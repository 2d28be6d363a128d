use crate::actor::{Actor, Addr};
use dashmap::DashMap;
use std::{any::Any, sync::Arc};

/// Thread-safe address book of typed actor addresses, keyed by name.
///
/// Keys are namespaced by the address type, so the same name may hold
/// addresses of different actor kinds.
#[derive(Default, Clone)]
pub struct Registry {
    by_name: Arc<DashMap<String, Box<dyn Any + Send + Sync>>>,
}

impl Registry {
    fn key<A: Actor>(name: &str) -> String {
        format!("{}::{}", std::any::type_name::<Addr<A>>(), name)
    }

    pub fn insert_addr<A: Actor>(&self, name: &str, addr: Addr<A>)
    where
        Addr<A>: Send + Sync + 'static,
    {
        self.by_name.insert(Self::key::<A>(name), Box::new(addr));
    }

    pub fn get_addr<A: Actor>(&self, name: &str) -> Option<Addr<A>>
    where
        Addr<A>: Send + Sync + 'static,
    {
        self.by_name
            .get(&Self::key::<A>(name))?
            .downcast_ref::<Addr<A>>()
            .cloned()
    }

    /// Drop every published address so idle mailboxes can close.
    pub fn clear(&self) {
        self.by_name.clear();
    }
}
