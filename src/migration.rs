//! Schema migrations for the rental platform.
//!
//! Run at startup by the server binary and by every integration test against
//! an in-memory SQLite database.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateReferenceTables),
            Box::new(CreateVehicleTables),
            Box::new(CreateBookingTables),
            Box::new(CreateSearchIndexes),
        ]
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    Id,
    Name,
    City,
    Address,
}

#[derive(DeriveIden)]
enum Features {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    PlateNumber,
    Brand,
    Model,
    Year,
    Seats,
    Transmission,
    FuelType,
    DailyRentalFee,
    CategoryId,
    LocationId,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
enum VehicleFeatures {
    Table,
    VehicleId,
    FeatureId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FullName,
    Email,
    Phone,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rentals {
    Table,
    Id,
    Reference,
    UserId,
    VehicleId,
    PickupLocationId,
    ReturnLocationId,
    StartDate,
    EndDate,
    TotalPrice,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    RentalId,
    Amount,
    Method,
    PaidAt,
}

pub struct CreateReferenceTables;

impl MigrationName for CreateReferenceTables {
    fn name(&self) -> &'static str {
        "m20250101_000001_create_reference_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateReferenceTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::Name).string().not_null())
                    .col(ColumnDef::new(Locations::City).string().not_null())
                    .col(ColumnDef::new(Locations::Address).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Features::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Features::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Features::Name).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Features::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

pub struct CreateVehicleTables;

impl MigrationName for CreateVehicleTables {
    fn name(&self) -> &'static str {
        "m20250101_000002_create_vehicle_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateVehicleTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Vehicles::PlateNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Vehicles::Brand).string().not_null())
                    .col(ColumnDef::new(Vehicles::Model).string().not_null())
                    .col(ColumnDef::new(Vehicles::Year).integer().not_null())
                    .col(ColumnDef::new(Vehicles::Seats).integer().not_null())
                    .col(ColumnDef::new(Vehicles::Transmission).string_len(16).not_null())
                    .col(ColumnDef::new(Vehicles::FuelType).string_len(16).not_null())
                    .col(ColumnDef::new(Vehicles::DailyRentalFee).double().not_null())
                    .col(ColumnDef::new(Vehicles::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Vehicles::LocationId).integer().not_null())
                    .col(
                        ColumnDef::new(Vehicles::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_category")
                            .from(Vehicles::Table, Vehicles::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_location")
                            .from(Vehicles::Table, Vehicles::LocationId)
                            .to(Locations::Table, Locations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VehicleFeatures::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VehicleFeatures::VehicleId).integer().not_null())
                    .col(ColumnDef::new(VehicleFeatures::FeatureId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(VehicleFeatures::VehicleId)
                            .col(VehicleFeatures::FeatureId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_features_vehicle")
                            .from(VehicleFeatures::Table, VehicleFeatures::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_features_feature")
                            .from(VehicleFeatures::Table, VehicleFeatures::FeatureId)
                            .to(Features::Table, Features::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VehicleFeatures::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await
    }
}

pub struct CreateBookingTables;

impl MigrationName for CreateBookingTables {
    fn name(&self) -> &'static str {
        "m20250101_000003_create_booking_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateBookingTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rentals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rentals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rentals::Reference).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Rentals::UserId).integer().not_null())
                    .col(ColumnDef::new(Rentals::VehicleId).integer().not_null())
                    .col(ColumnDef::new(Rentals::PickupLocationId).integer().not_null())
                    .col(ColumnDef::new(Rentals::ReturnLocationId).integer().not_null())
                    .col(ColumnDef::new(Rentals::StartDate).date().not_null())
                    .col(ColumnDef::new(Rentals::EndDate).date().not_null())
                    .col(ColumnDef::new(Rentals::TotalPrice).double().not_null())
                    .col(ColumnDef::new(Rentals::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Rentals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_user")
                            .from(Rentals::Table, Rentals::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_vehicle")
                            .from(Rentals::Table, Rentals::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_pickup_location")
                            .from(Rentals::Table, Rentals::PickupLocationId)
                            .to(Locations::Table, Locations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_return_location")
                            .from(Rentals::Table, Rentals::ReturnLocationId)
                            .to(Locations::Table, Locations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::RentalId).integer().not_null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::Method).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Payments::PaidAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_rental")
                            .from(Payments::Table, Payments::RentalId)
                            .to(Rentals::Table, Rentals::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rentals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

/// B-tree indexes on the columns the search pipeline filters and sorts by.
pub struct CreateSearchIndexes;

impl MigrationName for CreateSearchIndexes {
    fn name(&self) -> &'static str {
        "m20250101_000004_create_search_indexes"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateSearchIndexes {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_vehicles_location_fee")
                    .table(Vehicles::Table)
                    .col(Vehicles::LocationId)
                    .col(Vehicles::DailyRentalFee)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_vehicles_category")
                    .table(Vehicles::Table)
                    .col(Vehicles::CategoryId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rentals_vehicle_window")
                    .table(Rentals::Table)
                    .col(Rentals::VehicleId)
                    .col(Rentals::StartDate)
                    .col(Rentals::EndDate)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rentals_user")
                    .table(Rentals::Table)
                    .col(Rentals::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_rentals_user",
            "idx_rentals_vehicle_window",
            "idx_vehicles_category",
            "idx_vehicles_location_fee",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}
