use sqlx::PgConnection;

/// ExternalConnectivity abstracts the set of external systems the app talks to (currently
/// just PostgreSQL) so domain logic can be exercised in tests without any real I/O.
/// Driven adapters receive an implementation of this trait rather than holding a pool
/// themselves, keeping the store an injected dependency instead of a hidden singleton.
pub trait ExternalConnectivity: Sync {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    /// Acquires a handle which can be used to communicate with the database
    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

/// A held database connection which queries can be executed against
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}
