use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "anime_entries")]
pub struct Model {
    /// Random UUIDv4, opaque to clients.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: i32,
    pub title: String,
    /// JSON array of genre strings.
    pub genres: String,
    pub rating: i32,
    pub status: String,
    pub notes: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
