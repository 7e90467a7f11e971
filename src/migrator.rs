//! Schema migrations.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250110_000001_create_tables::Migration)]
    }
}

mod m20250110_000001_create_tables {
    use sea_orm_migration::{prelude::*, schema::*};

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(pk_auto(Users::Id))
                        .col(string_len(Users::Name, 100))
                        .col(string_len(Users::Email, 255))
                        .col(string_len_null(Users::Phone, 50))
                        .col(string_len_null(Users::Company, 100))
                        .col(string_len_null(Users::Department, 100))
                        .col(string_len_null(Users::JobTitle, 100))
                        .col(string_len_null(Users::Address, 255))
                        .col(string_len_null(Users::City, 100))
                        .col(string_len_null(Users::County, 100))
                        .col(string_len_null(Users::Postcode, 20))
                        .col(string_len(Users::Role, 50))
                        .col(string_len_null(Users::Avatar, 500))
                        .col(string_len(Users::HashedPassword, 255))
                        .col(boolean(Users::IsActive))
                        .col(timestamp_with_time_zone(Users::JoinDate))
                        .col(timestamp_with_time_zone(Users::CreatedAt))
                        .col(timestamp_with_time_zone_null(Users::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-users-email")
                        .table(Users::Table)
                        .col(Users::Email)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Templates::Table)
                        .if_not_exists()
                        .col(pk_auto(Templates::Id))
                        .col(string_len(Templates::Name, 255))
                        .col(text_null(Templates::Description))
                        .col(string_len(Templates::TemplateType, 50))
                        .col(string_len(Templates::Category, 100))
                        .col(integer(Templates::UsageCount))
                        .col(json_null(Templates::Fields))
                        .col(integer(Templates::CreatedBy))
                        .col(boolean(Templates::IsActive))
                        .col(timestamp_with_time_zone(Templates::CreatedAt))
                        .col(timestamp_with_time_zone_null(Templates::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-templates-created_by")
                                .from(Templates::Table, Templates::CreatedBy)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Quotations::Table)
                        .if_not_exists()
                        .col(pk_auto(Quotations::Id))
                        .col(string_len(Quotations::QuoteNumber, 50))
                        .col(text(Quotations::Description))
                        .col(string_len(Quotations::CustomerName, 255))
                        .col(string_len(Quotations::CustomerEmail, 255))
                        .col(string_len_null(Quotations::CustomerPhone, 50))
                        .col(string_len_null(Quotations::SoldToParty, 255))
                        .col(text_null(Quotations::SiteAddress))
                        .col(string_len_null(Quotations::ExternalReference, 100))
                        .col(string_len(Quotations::Status, 50))
                        .col(integer_null(Quotations::TemplateId))
                        .col(integer(Quotations::CreatedBy))
                        .col(decimal_len(Quotations::TotalAmount, 12, 2))
                        .col(timestamp_with_time_zone_null(Quotations::ValidFrom))
                        .col(timestamp_with_time_zone_null(Quotations::ValidTo))
                        .col(json_null(Quotations::Location))
                        .col(timestamp_with_time_zone(Quotations::CreatedAt))
                        .col(timestamp_with_time_zone_null(Quotations::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-quotations-template_id")
                                .from(Quotations::Table, Quotations::TemplateId)
                                .to(Templates::Table, Templates::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-quotations-created_by")
                                .from(Quotations::Table, Quotations::CreatedBy)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-quotations-quote_number")
                        .table(Quotations::Table)
                        .col(Quotations::QuoteNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(QuotationItems::Table)
                        .if_not_exists()
                        .col(pk_auto(QuotationItems::Id))
                        .col(integer(QuotationItems::QuotationId))
                        .col(string_len(QuotationItems::Name, 255))
                        .col(text_null(QuotationItems::Description))
                        .col(integer(QuotationItems::Quantity))
                        .col(decimal_len(QuotationItems::UnitPrice, 12, 2))
                        .col(decimal_len(QuotationItems::Total, 12, 2))
                        .col(timestamp_with_time_zone(QuotationItems::CreatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-quotation_items-quotation_id")
                                .from(QuotationItems::Table, QuotationItems::QuotationId)
                                .to(Quotations::Table, Quotations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ActivityLogs::Table)
                        .if_not_exists()
                        .col(pk_auto(ActivityLogs::Id))
                        .col(integer(ActivityLogs::UserId))
                        .col(integer_null(ActivityLogs::QuotationId))
                        .col(string_len(ActivityLogs::Action, 100))
                        .col(text_null(ActivityLogs::Description))
                        .col(json_null(ActivityLogs::Metadata))
                        .col(timestamp_with_time_zone(ActivityLogs::CreatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-activity_logs-user_id")
                                .from(ActivityLogs::Table, ActivityLogs::UserId)
                                .to(Users::Table, Users::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-activity_logs-quotation_id")
                                .from(ActivityLogs::Table, ActivityLogs::QuotationId)
                                .to(Quotations::Table, Quotations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Reports::Table)
                        .if_not_exists()
                        .col(pk_auto(Reports::Id))
                        .col(string_len(Reports::Name, 255))
                        .col(string_len(Reports::ReportType, 100))
                        .col(string_len(Reports::Format, 20))
                        .col(string_len(Reports::Status, 50))
                        .col(string_len_null(Reports::FilePath, 500))
                        .col(integer(Reports::GeneratedBy))
                        .col(json_null(Reports::Filters))
                        .col(timestamp_with_time_zone(Reports::CreatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-reports-generated_by")
                                .from(Reports::Table, Reports::GeneratedBy)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Reports::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(QuotationItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Quotations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Templates::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Name,
        Email,
        Phone,
        Company,
        Department,
        JobTitle,
        Address,
        City,
        County,
        Postcode,
        Role,
        Avatar,
        HashedPassword,
        IsActive,
        JoinDate,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Templates {
        Table,
        Id,
        Name,
        Description,
        TemplateType,
        Category,
        UsageCount,
        Fields,
        CreatedBy,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Quotations {
        Table,
        Id,
        QuoteNumber,
        Description,
        CustomerName,
        CustomerEmail,
        CustomerPhone,
        SoldToParty,
        SiteAddress,
        ExternalReference,
        Status,
        TemplateId,
        CreatedBy,
        TotalAmount,
        ValidFrom,
        ValidTo,
        Location,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum QuotationItems {
        Table,
        Id,
        QuotationId,
        Name,
        Description,
        Quantity,
        UnitPrice,
        Total,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum ActivityLogs {
        Table,
        Id,
        UserId,
        QuotationId,
        Action,
        Description,
        Metadata,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Reports {
        Table,
        Id,
        Name,
        ReportType,
        Format,
        Status,
        FilePath,
        GeneratedBy,
        Filters,
        CreatedAt,
    }
}
