use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;

use crate::models::profiles::{self, Roles};
use crate::search::SearchCriteria;

/// Build the profile fetch for a craftsman search: professionals only, with
/// the optional name substring and trade filters pushed into SQL. Rating and
/// distance are applied after the fetch.
pub fn craftsman_select(criteria: &SearchCriteria) -> Select<profiles::Entity> {
    let mut query = profiles::Entity::find().filter(profiles::Column::Role.eq(Roles::Professional));

    if let Some(term) = &criteria.term {
        let pattern = format!("%{}%", escape_like(term));
        query = query.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        profiles::Entity,
                        profiles::Column::FirstName,
                    ))))
                    .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        profiles::Entity,
                        profiles::Column::LastName,
                    ))))
                    .like(pattern),
                ),
        );
    }

    if let Some(craftsman_type) = criteria.craftsman_type {
        query = query.filter(profiles::Column::CraftsmanType.eq(craftsman_type));
    }

    query
}

pub async fn find_craftsmen(
    db: &DatabaseConnection,
    criteria: &SearchCriteria,
) -> Result<Vec<profiles::Model>, DbErr> {
    craftsman_select(criteria).all(db).await
}

/// Fetch a single professional profile.
pub async fn get_craftsman(
    db: &DatabaseConnection,
    id: uuid::Uuid,
) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find_by_id(id)
        .filter(profiles::Column::Role.eq(Roles::Professional))
        .one(db)
        .await
}

/// Escape LIKE wildcards so user input only matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::CraftsmanType;

    fn sql(criteria: &SearchCriteria) -> String {
        craftsman_select(criteria)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn always_restricts_to_professionals() {
        let sql = sql(&SearchCriteria::default());
        assert!(sql.contains("'professional'"), "{sql}");
        assert!(!sql.contains("LIKE"), "{sql}");
        assert!(!sql.contains("craftsman_type\" ="), "{sql}");
    }

    #[test]
    fn name_term_matches_first_or_last_name_case_insensitively() {
        let sql = sql(&SearchCriteria {
            term: Some("pop".to_string()),
            ..Default::default()
        });
        assert!(sql.contains("LOWER"), "{sql}");
        assert!(sql.contains("first_name"), "{sql}");
        assert!(sql.contains("last_name"), "{sql}");
        assert!(sql.contains("'%pop%'"), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn trade_filter_is_an_equality() {
        let sql = sql(&SearchCriteria {
            craftsman_type: Some(CraftsmanType::Plumber),
            ..Default::default()
        });
        assert!(sql.contains("'plumber'"), "{sql}");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("ion"), "ion");
    }
}
