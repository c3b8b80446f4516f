use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users_and_suppliers::Migration),
            Box::new(m20240301_000002_create_asset_tables::Migration),
            Box::new(m20240301_000003_create_stock_entries_table::Migration),
            Box::new(m20240301_000004_create_purchasing_tables::Migration),
            Box::new(m20240301_000005_create_maintenance_records_table::Migration),
            Box::new(m20240301_000006_create_production_records_table::Migration),
            Box::new(m20240301_000007_create_todos_table::Migration),
            Box::new(m20240301_000008_create_activities_table::Migration),
        ]
    }
}

/// Columns every record table carries
fn timestamps<T: IntoIden + Copy>(table: &mut TableCreateStatement, created: T, updated: T) {
    table
        .col(
            ColumnDef::new(created)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(updated)
                .timestamp_with_time_zone()
                .not_null(),
        );
}

fn quantity<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).double().not_null().default(0.0).to_owned()
}

mod m20240301_000001_create_users_and_suppliers {

    use super::timestamps;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_users_and_suppliers"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut users = Table::create()
                .table(Users::Table)
                .if_not_exists()
                .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                .col(
                    ColumnDef::new(Users::Username)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Users::Name).string().not_null())
                .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                .col(ColumnDef::new(Users::Role).string_len(50).not_null())
                .col(ColumnDef::new(Users::Status).string_len(50).not_null())
                .to_owned();
            timestamps(&mut users, Users::CreatedAt, Users::UpdatedAt);
            manager.create_table(users).await?;

            let mut suppliers = Table::create()
                .table(Suppliers::Table)
                .if_not_exists()
                .col(ColumnDef::new(Suppliers::Id).uuid().primary_key().not_null())
                .col(
                    ColumnDef::new(Suppliers::Name)
                        .string()
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Suppliers::Contact).string().null())
                .col(ColumnDef::new(Suppliers::Phone).string().null())
                .col(ColumnDef::new(Suppliers::Email).string().null())
                .col(ColumnDef::new(Suppliers::Address).text().null())
                .col(ColumnDef::new(Suppliers::Status).string_len(50).not_null())
                .col(ColumnDef::new(Suppliers::Remarks).text().null())
                .to_owned();
            timestamps(&mut suppliers, Suppliers::CreatedAt, Suppliers::UpdatedAt);
            manager.create_table(suppliers).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum Users {
        Table,
        Id,
        Username,
        Name,
        PasswordHash,
        Role,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum Suppliers {
        Table,
        Id,
        Name,
        Contact,
        Phone,
        Email,
        Address,
        Status,
        Remarks,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000002_create_asset_tables {

    use super::{quantity, timestamps};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_asset_tables"
        }
    }

    /// id, code (unique), name and status; shared by every asset table
    fn asset_table(table: Asset) -> TableCreateStatement {
        Table::create()
            .table(table)
            .if_not_exists()
            .col(ColumnDef::new(Asset::Id).uuid().primary_key().not_null())
            .col(
                ColumnDef::new(Asset::Code)
                    .string_len(100)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Asset::Name).string().not_null())
            .col(ColumnDef::new(Asset::Status).string_len(50).not_null())
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut inventory = asset_table(Asset::InventoryItems);
            inventory
                .col(ColumnDef::new(Asset::Category).string().null())
                .col(ColumnDef::new(Asset::Unit).string_len(20).null())
                .col(ColumnDef::new(Asset::Location).string().null())
                .col(quantity(Asset::MinStock))
                .col(quantity(Asset::Balance));
            timestamps(&mut inventory, Asset::CreatedAt, Asset::UpdatedAt);
            manager.create_table(inventory).await?;

            let mut extruders = asset_table(Asset::Extruders);
            extruders
                .col(ColumnDef::new(Asset::Model).string().null())
                .col(ColumnDef::new(Asset::Capacity).double().null())
                .col(ColumnDef::new(Asset::Location).string().null())
                .col(ColumnDef::new(Asset::Remarks).text().null());
            timestamps(&mut extruders, Asset::CreatedAt, Asset::UpdatedAt);
            manager.create_table(extruders).await?;

            let mut materials = asset_table(Asset::Materials);
            materials
                .col(ColumnDef::new(Asset::Grade).string().null())
                .col(ColumnDef::new(Asset::Supplier).string().null())
                .col(ColumnDef::new(Asset::Unit).string_len(20).null())
                .col(quantity(Asset::MinStock))
                .col(quantity(Asset::Balance));
            timestamps(&mut materials, Asset::CreatedAt, Asset::UpdatedAt);
            manager.create_table(materials).await?;

            let mut products = asset_table(Asset::Products);
            products
                .col(ColumnDef::new(Asset::Description).text().null())
                .col(ColumnDef::new(Asset::Material).string_len(100).null())
                .col(ColumnDef::new(Asset::Unit).string_len(20).null())
                .col(ColumnDef::new(Asset::Weight).double().null())
                .col(quantity(Asset::Balance));
            timestamps(&mut products, Asset::CreatedAt, Asset::UpdatedAt);
            manager.create_table(products).await?;

            let mut spareparts = asset_table(Asset::Spareparts);
            spareparts
                .col(ColumnDef::new(Asset::Extruder).string_len(100).null())
                .col(ColumnDef::new(Asset::Unit).string_len(20).null())
                .col(ColumnDef::new(Asset::Price).double().null())
                .col(ColumnDef::new(Asset::Supplier).string().null())
                .col(ColumnDef::new(Asset::Location).string().null())
                .col(quantity(Asset::MinStock))
                .col(quantity(Asset::Balance));
            timestamps(&mut spareparts, Asset::CreatedAt, Asset::UpdatedAt);
            manager.create_table(spareparts).await?;

            let mut others = asset_table(Asset::OtherAssets);
            others
                .col(ColumnDef::new(Asset::Category).string().null())
                .col(ColumnDef::new(Asset::Unit).string_len(20).null())
                .col(ColumnDef::new(Asset::Location).string().null())
                .col(quantity(Asset::MinStock))
                .col(quantity(Asset::Balance));
            timestamps(&mut others, Asset::CreatedAt, Asset::UpdatedAt);
            manager.create_table(others).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for table in [
                Asset::OtherAssets,
                Asset::Spareparts,
                Asset::Products,
                Asset::Materials,
                Asset::Extruders,
                Asset::InventoryItems,
            ] {
                manager
                    .drop_table(Table::drop().table(table).to_owned())
                    .await?;
            }
            Ok(())
        }
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum Asset {
        InventoryItems,
        Extruders,
        Materials,
        Products,
        Spareparts,
        OtherAssets,
        Id,
        Code,
        Name,
        Status,
        Category,
        Unit,
        Location,
        MinStock,
        Balance,
        Model,
        Capacity,
        Remarks,
        Grade,
        Supplier,
        Description,
        Material,
        Weight,
        Extruder,
        Price,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000003_create_stock_entries_table {

    use super::timestamps;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_stock_entries_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(StockEntries::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(StockEntries::Id)
                        .uuid()
                        .primary_key()
                        .not_null(),
                )
                .col(ColumnDef::new(StockEntries::Ledger).string_len(20).not_null())
                .col(
                    ColumnDef::new(StockEntries::Date)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(ColumnDef::new(StockEntries::ItemType).string_len(20).not_null())
                .col(ColumnDef::new(StockEntries::Code).string_len(100).not_null())
                .col(ColumnDef::new(StockEntries::Direction).string_len(10).not_null())
                .col(ColumnDef::new(StockEntries::Quantity).double().not_null())
                .col(ColumnDef::new(StockEntries::Balance).double().not_null())
                .col(ColumnDef::new(StockEntries::Extruder).string_len(100).null())
                .col(ColumnDef::new(StockEntries::Reference).string().null())
                .col(ColumnDef::new(StockEntries::Remarks).text().null())
                .to_owned();
            timestamps(&mut table, StockEntries::CreatedAt, StockEntries::UpdatedAt);
            manager.create_table(table).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_entries_item")
                        .table(StockEntries::Table)
                        .col(StockEntries::ItemType)
                        .col(StockEntries::Code)
                        .col(StockEntries::Date)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_entries_extruder")
                        .table(StockEntries::Table)
                        .col(StockEntries::Extruder)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockEntries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum StockEntries {
        Table,
        Id,
        Ledger,
        Date,
        ItemType,
        Code,
        Direction,
        Quantity,
        Balance,
        Extruder,
        Reference,
        Remarks,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000004_create_purchasing_tables {

    use super::{quantity, timestamps};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_purchasing_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut orders = Table::create()
                .table(PurchaseOrders::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(PurchaseOrders::Id)
                        .uuid()
                        .primary_key()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(PurchaseOrders::OrderNo)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(
                    ColumnDef::new(PurchaseOrders::Date)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(ColumnDef::new(PurchaseOrders::Supplier).string().not_null())
                .col(
                    ColumnDef::new(PurchaseOrders::ItemType)
                        .string_len(20)
                        .not_null(),
                )
                .col(ColumnDef::new(PurchaseOrders::Code).string_len(100).not_null())
                .col(ColumnDef::new(PurchaseOrders::Description).text().null())
                .col(quantity(PurchaseOrders::Quantity))
                .col(quantity(PurchaseOrders::UnitPrice))
                .col(quantity(PurchaseOrders::Total))
                .col(
                    ColumnDef::new(PurchaseOrders::DeliveryDate)
                        .timestamp_with_time_zone()
                        .null(),
                )
                .col(ColumnDef::new(PurchaseOrders::Status).string_len(50).not_null())
                .col(ColumnDef::new(PurchaseOrders::Remarks).text().null())
                .to_owned();
            timestamps(
                &mut orders,
                PurchaseOrders::CreatedAt,
                PurchaseOrders::UpdatedAt,
            );
            manager.create_table(orders).await?;

            let mut costs = Table::create()
                .table(Costs::Table)
                .if_not_exists()
                .col(ColumnDef::new(Costs::Id).uuid().primary_key().not_null())
                .col(
                    ColumnDef::new(Costs::Date)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(ColumnDef::new(Costs::Category).string().not_null())
                .col(ColumnDef::new(Costs::Description).text().null())
                .col(quantity(Costs::Amount))
                .col(ColumnDef::new(Costs::Reference).string().null())
                .col(ColumnDef::new(Costs::Remarks).text().null())
                .to_owned();
            timestamps(&mut costs, Costs::CreatedAt, Costs::UpdatedAt);
            manager.create_table(costs).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_costs_date")
                        .table(Costs::Table)
                        .col(Costs::Date)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Costs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum PurchaseOrders {
        Table,
        Id,
        OrderNo,
        Date,
        Supplier,
        ItemType,
        Code,
        Description,
        Quantity,
        UnitPrice,
        Total,
        DeliveryDate,
        Status,
        Remarks,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum Costs {
        Table,
        Id,
        Date,
        Category,
        Description,
        Amount,
        Reference,
        Remarks,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000005_create_maintenance_records_table {

    use super::{quantity, timestamps};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000005_create_maintenance_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(MaintenanceRecords::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(MaintenanceRecords::Id)
                        .uuid()
                        .primary_key()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(MaintenanceRecords::Date)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(MaintenanceRecords::Extruder)
                        .string_len(100)
                        .not_null(),
                )
                .col(
                    ColumnDef::new(MaintenanceRecords::MaintenanceType)
                        .string_len(50)
                        .not_null(),
                )
                .col(ColumnDef::new(MaintenanceRecords::Description).text().null())
                .col(ColumnDef::new(MaintenanceRecords::Sparepart).string().null())
                .col(ColumnDef::new(MaintenanceRecords::Technician).string().null())
                .col(quantity(MaintenanceRecords::Downtime))
                .col(quantity(MaintenanceRecords::Cost))
                .col(
                    ColumnDef::new(MaintenanceRecords::Status)
                        .string_len(50)
                        .not_null(),
                )
                .col(ColumnDef::new(MaintenanceRecords::Remarks).text().null())
                .to_owned();
            timestamps(
                &mut table,
                MaintenanceRecords::CreatedAt,
                MaintenanceRecords::UpdatedAt,
            );
            manager.create_table(table).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_maintenance_records_extruder")
                        .table(MaintenanceRecords::Table)
                        .col(MaintenanceRecords::Extruder)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaintenanceRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum MaintenanceRecords {
        Table,
        Id,
        Date,
        Extruder,
        MaintenanceType,
        Description,
        Sparepart,
        Technician,
        Downtime,
        Cost,
        Status,
        Remarks,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000006_create_production_records_table {

    use super::{quantity, timestamps};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000006_create_production_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(ProductionRecords::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(ProductionRecords::Id)
                        .uuid()
                        .primary_key()
                        .not_null(),
                )
                .col(ColumnDef::new(ProductionRecords::Kind).string_len(20).not_null())
                .col(
                    ColumnDef::new(ProductionRecords::Lotno)
                        .string_len(100)
                        .not_null(),
                )
                .col(
                    ColumnDef::new(ProductionRecords::Orderdate)
                        .timestamp_with_time_zone()
                        .null(),
                )
                .col(ColumnDef::new(ProductionRecords::Product).string().null())
                .col(ColumnDef::new(ProductionRecords::Extruder).string_len(100).null())
                .col(ColumnDef::new(ProductionRecords::Customer).string().null())
                .col(ColumnDef::new(ProductionRecords::Operator).string().null())
                .col(quantity(ProductionRecords::Totalorder))
                .col(quantity(ProductionRecords::Irr))
                .col(quantity(ProductionRecords::Ipqc))
                .col(quantity(ProductionRecords::Setup))
                .col(
                    ColumnDef::new(ProductionRecords::Starttime)
                        .timestamp_with_time_zone()
                        .null(),
                )
                .col(
                    ColumnDef::new(ProductionRecords::Endtime)
                        .timestamp_with_time_zone()
                        .null(),
                )
                .col(quantity(ProductionRecords::Downtime))
                .col(quantity(ProductionRecords::Totaloutput))
                .col(quantity(ProductionRecords::Reject))
                .col(quantity(ProductionRecords::Operatingtime))
                .col(quantity(ProductionRecords::Prodleadtime))
                .col(quantity(ProductionRecords::Planprodtime))
                .col(quantity(ProductionRecords::Availability))
                .col(quantity(ProductionRecords::Performance))
                .col(quantity(ProductionRecords::Quality))
                .col(quantity(ProductionRecords::Oee))
                .col(
                    ColumnDef::new(ProductionRecords::Status)
                        .string_len(50)
                        .not_null(),
                )
                .col(ColumnDef::new(ProductionRecords::Remarks).text().null())
                .to_owned();
            timestamps(
                &mut table,
                ProductionRecords::CreatedAt,
                ProductionRecords::UpdatedAt,
            );
            manager.create_table(table).await?;

            // A lot has at most one record of each kind
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_production_records_kind_lotno")
                        .table(ProductionRecords::Table)
                        .col(ProductionRecords::Kind)
                        .col(ProductionRecords::Lotno)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_production_records_lotno")
                        .table(ProductionRecords::Table)
                        .col(ProductionRecords::Lotno)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductionRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum ProductionRecords {
        Table,
        Id,
        Kind,
        Lotno,
        Orderdate,
        Product,
        Extruder,
        Customer,
        Operator,
        Totalorder,
        Irr,
        Ipqc,
        Setup,
        Starttime,
        Endtime,
        Downtime,
        Totaloutput,
        Reject,
        Operatingtime,
        Prodleadtime,
        Planprodtime,
        Availability,
        Performance,
        Quality,
        Oee,
        Status,
        Remarks,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000007_create_todos_table {

    use super::timestamps;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000007_create_todos_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create()
                .table(Todos::Table)
                .if_not_exists()
                .col(ColumnDef::new(Todos::Id).uuid().primary_key().not_null())
                .col(ColumnDef::new(Todos::Title).string().not_null())
                .col(ColumnDef::new(Todos::Description).text().null())
                .col(ColumnDef::new(Todos::Date).date().not_null())
                .col(ColumnDef::new(Todos::EndDate).date().null())
                .col(ColumnDef::new(Todos::Priority).string_len(20).not_null())
                .col(ColumnDef::new(Todos::Status).string_len(20).not_null())
                .col(ColumnDef::new(Todos::Assignee).string().null())
                .col(ColumnDef::new(Todos::RecurrenceUnit).string_len(20).null())
                .col(ColumnDef::new(Todos::RecurrenceCount).integer().null())
                .col(ColumnDef::new(Todos::RecurrenceUntil).date().null())
                .col(ColumnDef::new(Todos::ParentId).uuid().null())
                .to_owned();
            timestamps(&mut table, Todos::CreatedAt, Todos::UpdatedAt);
            manager.create_table(table).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_todos_parent_id")
                        .table(Todos::Table)
                        .col(Todos::ParentId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_todos_date")
                        .table(Todos::Table)
                        .col(Todos::Date)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Todos::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum Todos {
        Table,
        Id,
        Title,
        Description,
        Date,
        EndDate,
        Priority,
        Status,
        Assignee,
        RecurrenceUnit,
        RecurrenceCount,
        RecurrenceUntil,
        ParentId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000008_create_activities_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000008_create_activities_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Activities::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Activities::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Activities::Date)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Activities::Activity).string().not_null())
                        .col(ColumnDef::new(Activities::Detail).text().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_activities_date")
                        .table(Activities::Table)
                        .col(Activities::Date)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Activities::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Activities {
        Table,
        Id,
        Date,
        Activity,
        Detail,
    }
}
