#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::database::entity::{category, location, post, user};
    use crate::database::postgres_repo::{PostgresCategoryRepository, PostgresPostRepository};
    use blogicum_core::domain::Post;
    use blogicum_core::ports::{BaseRepository, CategoryRepository, PostRepository};
    use blogicum_core::query::{PostFilter, PostQuery};
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait, Value};

    fn post_model(id: i64) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            pub_date: now.into(),
            author_id: 1,
            category_id: Some(2),
            location_id: None,
            is_published: true,
            created_at: now.into(),
        }
    }

    fn user_model(id: i64, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "hash".to_owned(),
            date_joined: chrono::Utc::now().into(),
        }
    }

    fn category_model(id: i64, slug: &str) -> category::Model {
        category::Model {
            id,
            title: slug.to_uppercase(),
            description: String::new(),
            slug: slug.to_owned(),
            is_published: true,
            created_at: chrono::Utc::now().into(),
        }
    }

    /// A `(post_id, total_comments)` row; mock rows are read by index in key order.
    fn count_row(post_id: i64, total: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("post_id", Value::BigInt(Some(post_id))),
            ("total_comments", Value::BigInt(Some(total))),
        ])
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(42)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(42).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, 42);
        assert_eq!(post.category_id, Some(2));
    }

    #[tokio::test]
    async fn test_find_category_by_slug() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category::Model {
                id: 2,
                title: "Travel".to_owned(),
                description: "Trips".to_owned(),
                slug: "travel".to_owned(),
                is_published: false,
                created_at: chrono::Utc::now().into(),
            }]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let category = repo.find_by_slug("travel").await.unwrap().unwrap();

        assert_eq!(category.id, 2);
        assert!(!category.is_published);
    }

    #[test]
    fn test_published_query_joins_categories() {
        let query = PostQuery::get_published_posts(chrono::Utc::now(), PostFilter::new());

        let sql = PostgresPostRepository::select(&query)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("INNER JOIN \"categories\""));
        assert!(sql.contains("\"categories\".\"is_published\""));
        assert!(sql.contains("\"posts\".\"pub_date\" <="));
    }

    #[test]
    fn test_owner_query_has_no_join() {
        let query = PostQuery::get_posts(PostFilter::new().author(7));

        let sql = PostgresPostRepository::select(&query)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(!sql.contains("JOIN"));
        assert!(sql.contains("\"posts\".\"author_id\" = 7"));
    }

    #[test]
    fn test_page_orders_newest_first_with_id_tiebreak() {
        let query = PostQuery::get_posts(PostFilter::new().author(7));

        let sql = PostgresPostRepository::page(&query, 20, 10)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("ORDER BY \"posts\".\"pub_date\" DESC, \"posts\".\"id\" ASC"));
        assert!(sql.contains("LIMIT 10"));
        assert!(sql.contains("OFFSET 20"));
    }

    #[tokio::test]
    async fn test_fetch_annotates_each_row() {
        let mut located = post_model(7);
        located.author_id = 2;
        located.category_id = None;
        located.location_id = Some(5);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(9), located]])
            .append_query_results(vec![vec![user_model(1, "alice"), user_model(2, "bob")]])
            .append_query_results(vec![vec![category_model(2, "travel")]])
            .append_query_results(vec![vec![location::Model {
                id: 5,
                name: "Kazan".to_owned(),
                is_published: true,
                created_at: chrono::Utc::now().into(),
            }]])
            .append_query_results(vec![vec![count_row(9, 3)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let query = PostQuery::get_posts(PostFilter::new());

        let page = repo.fetch(&query, 0, 10).await.unwrap();

        let ids: Vec<i64> = page.iter().map(|s| s.post.id).collect();
        assert_eq!(ids, vec![9, 7]);

        assert_eq!(page[0].author.username, "alice");
        assert_eq!(page[0].category.as_ref().map(|c| c.slug.as_str()), Some("travel"));
        assert!(page[0].location.is_none());
        assert_eq!(page[0].comment_count, 3);

        assert_eq!(page[1].author.username, "bob");
        assert!(page[1].category.is_none());
        assert_eq!(page[1].location.as_ref().map(|l| l.name.as_str()), Some("Kazan"));
        assert_eq!(page[1].comment_count, 0);
    }

    #[tokio::test]
    async fn test_fetch_empty_page_skips_annotation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let query = PostQuery::get_posts(PostFilter::new());

        assert!(repo.fetch(&query, 30, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_summary_counts_comments() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(42)]])
            .append_query_results(vec![vec![user_model(1, "alice")]])
            .append_query_results(vec![vec![category_model(2, "travel")]])
            .append_query_results(vec![vec![count_row(42, 2)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let summary = repo.find_summary(42).await.unwrap().unwrap();

        assert_eq!(summary.post.id, 42);
        assert_eq!(summary.author.username, "alice");
        assert_eq!(summary.category.map(|c| c.id), Some(2));
        assert_eq!(summary.comment_count, 2);
    }

    #[tokio::test]
    async fn test_find_summary_of_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(repo.find_summary(404).await.unwrap().is_none());
    }
}
