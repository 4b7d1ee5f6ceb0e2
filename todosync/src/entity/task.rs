use sea_orm::entity::prelude::*;

/// A single to-do item. Visible only to the user that owns it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "_id")]
    pub id: String,
    pub text: String,
    pub created_at: ChronoDateTimeUtc,
    pub is_checked: bool,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
