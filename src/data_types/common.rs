pub type DocumentId = i64;

/// Identity of an entity which was never written to the database.
pub const ENTITY_IS_NOT_SAVED: DocumentId = -1;

pub trait Identifiable {
    fn as_i64(&self) -> DocumentId;
}

/// A record which is persisted with a generated identity.
pub trait Entity: Identifiable {
    /// Collection the entity is stored in.
    const COLL_NAME: &'static str;

    fn set_id(&mut self, id: DocumentId);

    fn is_saved(&self) -> bool {
        self.as_i64() != ENTITY_IS_NOT_SAVED
    }
}
