use std::collections::HashMap;

use sea_orm::{
    ConnectionTrait, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{Catalog, EngineError, ResultEngine};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Create a catalog entry with no ingredient assigned.
    pub async fn create_catalog_entry<C: Catalog>(
        &self,
        attrs: C::Attrs,
    ) -> ResultEngine<C::Entry> {
        let name = normalize_required_name(C::attrs_name(&attrs), C::LABEL)?;
        C::validate(&attrs)?;
        with_tx!(self, |db_tx| {
            ensure_name_available::<C>(&db_tx, &name, None).await?;

            let id = Uuid::new_v4();
            let insert = C::insert_query(id, name.clone(), &attrs);
            let backend = db_tx.get_database_backend();
            db_tx
                .execute(backend.build(&insert))
                .await
                .map_err(|err| EngineError::from_write(err, &name))?;

            let model = require_catalog::<C>(&db_tx, id).await?;
            Ok(C::Entry::from(model))
        })
    }

    pub async fn catalog_entry<C: Catalog>(&self, id: Uuid) -> ResultEngine<C::Entry> {
        with_tx!(self, |db_tx| {
            let model = require_catalog::<C>(&db_tx, id).await?;
            Ok(C::Entry::from(model))
        })
    }

    /// Return every entry of a catalog, ordered by name.
    pub async fn catalog_entries<C: Catalog>(&self) -> ResultEngine<Vec<C::Entry>> {
        with_tx!(self, |db_tx| {
            let models = C::find()
                .order_by_asc(C::name_column())
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(C::Entry::from).collect::<Vec<_>>())
        })
    }

    /// Rename an entry and replace its attributes.
    ///
    /// The assignment counter is never touched here.
    pub async fn update_catalog_entry<C: Catalog>(
        &self,
        id: Uuid,
        attrs: C::Attrs,
    ) -> ResultEngine<C::Entry> {
        let name = normalize_required_name(C::attrs_name(&attrs), C::LABEL)?;
        C::validate(&attrs)?;
        with_tx!(self, |db_tx| {
            require_catalog::<C>(&db_tx, id).await?;
            ensure_name_available::<C>(&db_tx, &name, Some(id)).await?;

            C::update_query(id, name.clone(), &attrs)
                .exec(&db_tx)
                .await
                .map_err(|err| EngineError::from_write(err, &name))?;

            let model = require_catalog::<C>(&db_tx, id).await?;
            Ok(C::Entry::from(model))
        })
    }

    /// Delete an entry no ingredient references any more.
    ///
    /// Fails with [`EngineError::StillAssigned`] while `ingredients_assigned`
    /// is not zero.
    pub async fn delete_catalog_entry<C: Catalog>(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_catalog::<C>(&db_tx, id).await?;
            let assigned = C::ingredients_assigned(&model);
            if assigned != 0 {
                return Err(EngineError::StillAssigned(format!(
                    "there are {assigned} ingredients which still use this {}",
                    C::LABEL
                )));
            }

            delete_catalog_row::<C>(&db_tx, id).await
        })
    }

    /// Add `delta` to the entry's `ingredients_assigned` counter.
    pub async fn adjust_assigned_count<C: Catalog>(
        &self,
        id: Uuid,
        delta: i32,
    ) -> ResultEngine<C::Entry> {
        with_tx!(self, |db_tx| {
            adjust_assigned_count_in::<C>(&db_tx, id, delta).await?;
            let model = require_catalog::<C>(&db_tx, id).await?;
            Ok(C::Entry::from(model))
        })
    }
}

pub(super) async fn require_catalog<C: Catalog>(
    db_tx: &DatabaseTransaction,
    id: Uuid,
) -> ResultEngine<C::Model> {
    C::find()
        .filter(C::id_column().eq(id))
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("{} {id}", C::LABEL)))
}

async fn ensure_name_available<C: Catalog>(
    db_tx: &DatabaseTransaction,
    name: &str,
    except: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query = C::find().filter(C::name_column().eq(name));
    if let Some(id) = except {
        query = query.filter(C::id_column().ne(id));
    }

    if query.one(db_tx).await?.is_some() {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}

async fn delete_catalog_row<C: Catalog>(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<()> {
    let result = C::delete_many()
        .filter(C::id_column().eq(id))
        .exec(db_tx)
        .await?;
    if result.rows_affected == 0 {
        return Err(EngineError::KeyNotFound(format!("{} {id}", C::LABEL)));
    }
    Ok(())
}

/// Apply `delta` to the counter as a single `SET n = n + delta` statement.
///
/// A decrement never takes the counter below zero.
pub(super) async fn adjust_assigned_count_in<C: Catalog>(
    db_tx: &DatabaseTransaction,
    id: Uuid,
    delta: i32,
) -> ResultEngine<()> {
    let column = C::assigned_column();
    let mut update = C::update_many()
        .col_expr(column, Expr::col(column).add(delta))
        .filter(C::id_column().eq(id));
    if delta < 0 {
        update = update.filter(column.gte(-delta));
    }

    let result = update.exec(db_tx).await?;
    if result.rows_affected == 0 {
        require_catalog::<C>(db_tx, id).await?;
        return Err(EngineError::InvalidAmount(format!(
            "{} {id} has fewer than {} ingredients assigned",
            C::LABEL,
            -delta
        )));
    }
    Ok(())
}

/// Load the entries with the given ids, keyed by id.
pub(super) async fn catalog_entries_by_id<C: Catalog>(
    db_tx: &DatabaseTransaction,
    ids: Vec<Uuid>,
) -> ResultEngine<HashMap<Uuid, C::Entry>> {
    let models = C::find()
        .filter(C::id_column().is_in(ids))
        .all(db_tx)
        .await?;
    Ok(models
        .into_iter()
        .map(|model| (C::entry_id(&model), C::Entry::from(model)))
        .collect())
}
