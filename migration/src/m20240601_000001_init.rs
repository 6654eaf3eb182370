use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== CITIES ==========
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cities::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Cities::Latitude).double().not_null())
                    .col(ColumnDef::new(Cities::Longitude).double().not_null())
                    .col(ColumnDef::new(Cities::Timezone).string_len(64))
                    .col(ColumnDef::new(Cities::Country).string_len(128))
                    .to_owned(),
            )
            .await?;

        // One row per normalized city name
        manager
            .create_index(
                Index::create()
                    .name("idx_cities_name")
                    .table(Cities::Table)
                    .col(Cities::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ========== SOLAR DATA ==========
        manager
            .create_table(
                Table::create()
                    .table(SolarData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SolarData::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SolarData::City).string_len(128).not_null())
                    .col(ColumnDef::new(SolarData::Date).date().not_null())
                    .col(ColumnDef::new(SolarData::Sunrise).time().not_null())
                    .col(ColumnDef::new(SolarData::Sunset).time().not_null())
                    .col(ColumnDef::new(SolarData::SolarNoon).time())
                    .col(ColumnDef::new(SolarData::DayLength).string_len(16))
                    .col(ColumnDef::new(SolarData::Country).string_len(128))
                    .col(ColumnDef::new(SolarData::Timezone).string_len(64))
                    .to_owned(),
            )
            .await?;

        // (city, date) is the cache key for solar lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_solar_data_city_date")
                    .table(SolarData::Table)
                    .col(SolarData::City)
                    .col(SolarData::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ========== USERS ==========
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(256)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                    .col(ColumnDef::new(Users::City).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(16)
                            .not_null()
                            .default("User"),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SolarData::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Cities {
    Table,
    Id,
    Name,
    Latitude,
    Longitude,
    Timezone,
    Country,
}

#[derive(DeriveIden)]
enum SolarData {
    Table,
    Id,
    City,
    Date,
    Sunrise,
    Sunset,
    SolarNoon,
    DayLength,
    Country,
    Timezone,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    PasswordHash,
    City,
    Role,
    CreatedAt,
}
