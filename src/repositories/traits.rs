//! Generic repository traits
//!
//! Uniform entry points for the single-row operations of every repository.
//! Operations that must join a transaction are exposed by the repositories
//! as associated functions taking a `&mut SqliteConnection` instead.

/// Inserts a new row
///
/// * `Entity` - row returned with the id assigned by the database
/// * `CreateDTO` - insert payload, without id
pub trait Create<Entity, CreateDTO> {
    /// # Returns
    /// * `Ok(Entity)` - the stored row
    /// * `Err(sqlx::Error)` - insert failed; a UNIQUE violation means the row
    ///   already exists
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Reads a single row by primary key
pub trait Read<Entity, Id> {
    /// # Returns
    /// * `Ok(Some(Entity))` - row found
    /// * `Ok(None)` - no row with that id
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Reads several rows by primary key
pub trait ReadMany<Entity, Id> {
    /// Rows come back in storage order, which may differ from `ids`; missing
    /// ids are skipped.
    async fn read_many(&self, ids: &[Id]) -> Result<Vec<Entity>, sqlx::Error>;
}

/// Partial update of an existing row
///
/// * `UpdateDTO` - only `Some(_)` fields are written
pub trait Update<Entity, UpdateDTO, Id> {
    /// # Returns
    /// * `Ok(Entity)` - the row after the update
    /// * `Err(sqlx::Error::RowNotFound)` - no row with that id
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Hard delete by primary key
pub trait Delete<Id> {
    /// # Returns
    /// * `Ok(true)` - a row was deleted
    /// * `Ok(false)` - nothing matched
    async fn delete(&self, id: &Id) -> Result<bool, sqlx::Error>;
}
