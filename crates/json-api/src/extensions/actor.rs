//! Authenticated actor stored in the depot by the auth middleware.

use salvo::prelude::{Depot, StatusError};
use storefront_app::domain::users::records::Actor;

const ACTOR_DEPOT_KEY: &str = "actor";

pub(crate) trait ActorExt {
    fn insert_actor(&mut self, actor: Actor);

    fn actor_or_401(&self) -> Result<Actor, StatusError>;

    /// The actor, if it is staff.
    fn staff_or_403(&self) -> Result<Actor, StatusError>;
}

impl ActorExt for Depot {
    fn insert_actor(&mut self, actor: Actor) {
        self.insert(ACTOR_DEPOT_KEY, actor);
    }

    fn actor_or_401(&self) -> Result<Actor, StatusError> {
        self.get::<Actor>(ACTOR_DEPOT_KEY)
            .copied()
            .map_err(|_missing| StatusError::unauthorized())
    }

    fn staff_or_403(&self) -> Result<Actor, StatusError> {
        let actor = self.actor_or_401()?;

        if !actor.is_staff() {
            return Err(StatusError::forbidden().brief("Staff only"));
        }

        Ok(actor)
    }
}
