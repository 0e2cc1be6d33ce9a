//! Initial schema migration.
//!
//! - `measurement_units`, `ingredient_states`, `ingredient_types`: the
//!   reference catalogs, each carrying its own `ingredients_assigned` counter
//! - `ingredients`: stocked items, one reference into every catalog
//! - `inflows`: ledger of stock entering the pantry

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum MeasurementUnits {
    Table,
    Id,
    Name,
    Precision,
    Abbreviation,
    IngredientsAssigned,
}

#[derive(Iden)]
enum IngredientStates {
    Table,
    Id,
    Name,
    IngredientsAssigned,
}

#[derive(Iden)]
enum IngredientTypes {
    Table,
    Id,
    Name,
    IngredientsAssigned,
}

#[derive(Iden)]
enum Ingredients {
    Table,
    Id,
    Name,
    CurrentStock,
    MeasurementUnitId,
    IngredientStateId,
    IngredientTypeId,
}

#[derive(Iden)]
enum Inflows {
    Table,
    Id,
    IngredientId,
    Date,
    Reason,
    Price,
    Quantity,
    AdditionalDetails,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Catalogs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MeasurementUnits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MeasurementUnits::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MeasurementUnits::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MeasurementUnits::Precision)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeasurementUnits::Abbreviation)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeasurementUnits::IngredientsAssigned)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IngredientStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IngredientStates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IngredientStates::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(IngredientStates::IngredientsAssigned)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IngredientTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IngredientTypes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IngredientTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(IngredientTypes::IngredientsAssigned)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Ingredients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ingredients::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Ingredients::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Ingredients::CurrentStock)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Ingredients::MeasurementUnitId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ingredients::IngredientStateId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ingredients::IngredientTypeId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ingredients-measurement_unit_id")
                            .from(Ingredients::Table, Ingredients::MeasurementUnitId)
                            .to(MeasurementUnits::Table, MeasurementUnits::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ingredients-ingredient_state_id")
                            .from(Ingredients::Table, Ingredients::IngredientStateId)
                            .to(IngredientStates::Table, IngredientStates::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ingredients-ingredient_type_id")
                            .from(Ingredients::Table, Ingredients::IngredientTypeId)
                            .to(IngredientTypes::Table, IngredientTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Inflows
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Inflows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inflows::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inflows::IngredientId).uuid().not_null())
                    .col(ColumnDef::new(Inflows::Date).date().not_null())
                    .col(ColumnDef::new(Inflows::Reason).string().not_null())
                    .col(ColumnDef::new(Inflows::Price).double().not_null())
                    .col(ColumnDef::new(Inflows::Quantity).double().not_null())
                    .col(ColumnDef::new(Inflows::AdditionalDetails).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-inflows-ingredient_id")
                            .from(Inflows::Table, Inflows::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-inflows-ingredient_id")
                    .table(Inflows::Table)
                    .col(Inflows::IngredientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-inflows-date")
                    .table(Inflows::Table)
                    .col(Inflows::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order of creation
        manager
            .drop_table(Table::drop().table(Inflows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IngredientTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IngredientStates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MeasurementUnits::Table).to_owned())
            .await?;
        Ok(())
    }
}
