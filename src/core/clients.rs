use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::queries::{
    delete_client_cascade, insert_client, load_clients, require_client, update_client,
};
use crate::errors::{AppError, AppResult};
use crate::models::Client;

/// High-level business logic for the `client` command family.
pub struct ClientLogic;

impl ClientLogic {
    pub fn add(pool: &mut DbPool, name: &str, rate: f64) -> AppResult<Client> {
        let name = Client::validate_name(name)?;
        let rate = Client::validate_rate(rate)?;

        let id = insert_client(&pool.conn, &name, rate)?;
        let client = require_client(&pool.conn, id)?;

        ttlog_soft(
            &pool.conn,
            "client_add",
            &format!("#{id}"),
            &format!("Added client '{}' at {:.2}/h", client.name, client.hourly_rate),
        );

        Ok(client)
    }

    /// Change name and/or rate. Already closed entries keep the earnings
    /// computed at clock-out time.
    pub fn update(
        pool: &mut DbPool,
        id: i64,
        name: Option<&str>,
        rate: Option<f64>,
    ) -> AppResult<Client> {
        if name.is_none() && rate.is_none() {
            return Err(AppError::Validation(
                "nothing to update: pass --name and/or --rate".into(),
            ));
        }

        let current = require_client(&pool.conn, id)?;

        let new_name = match name {
            Some(n) => Client::validate_name(n)?,
            None => current.name.clone(),
        };
        let new_rate = match rate {
            Some(r) => Client::validate_rate(r)?,
            None => current.hourly_rate,
        };

        update_client(&pool.conn, id, &new_name, new_rate)?;

        ttlog_soft(
            &pool.conn,
            "client_edit",
            &format!("#{id}"),
            &format!(
                "'{}' {:.2}/h -> '{}' {:.2}/h",
                current.name, current.hourly_rate, new_name, new_rate
            ),
        );

        require_client(&pool.conn, id)
    }

    /// Delete a client together with its time entries.
    /// Returns the number of entries removed.
    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<usize> {
        let client = require_client(&pool.conn, id)?;

        let removed = delete_client_cascade(&mut pool.conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("client #{id}")))?;

        ttlog_soft(
            &pool.conn,
            "client_del",
            &format!("#{id}"),
            &format!("Deleted client '{}' and {} time entries", client.name, removed),
        );

        Ok(removed)
    }

    pub fn list(pool: &mut DbPool) -> AppResult<Vec<Client>> {
        load_clients(&pool.conn)
    }
}
