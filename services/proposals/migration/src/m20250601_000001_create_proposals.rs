use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Proposals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Proposals::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Proposals::ClientName).string().not_null())
                    .col(ColumnDef::new(Proposals::CompanyName).string().not_null())
                    .col(ColumnDef::new(Proposals::Amount).string().not_null())
                    .col(ColumnDef::new(Proposals::Description).text().not_null())
                    .col(ColumnDef::new(Proposals::RecipientEmail).string().not_null())
                    .col(ColumnDef::new(Proposals::Validity).date())
                    .col(
                        ColumnDef::new(Proposals::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Proposals::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .to_owned(),
            )
            .await?;

        // History listing: ORDER BY submitted_at DESC, id DESC with keyset cursor.
        manager
            .create_index(
                Index::create()
                    .table(Proposals::Table)
                    .col(Proposals::SubmittedAt)
                    .col(Proposals::Id)
                    .name("idx_proposals_submitted_at_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Proposals::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Proposals {
    Table,
    Id,
    ClientName,
    CompanyName,
    Amount,
    Description,
    RecipientEmail,
    Validity,
    SubmittedAt,
    Status,
}
