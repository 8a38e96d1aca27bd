pub mod db;
pub mod errors;
pub mod movie;
pub mod role;
pub mod score;
pub mod user;
pub mod user_role;

#[cfg(test)]
mod db_tests {
    use chrono::Utc;
    use migration::MigratorTrait;
    use sea_orm::{ActiveModelTrait, EntityTrait, Set};

    use crate::{db, movie, score, user};

    // Exercises the schema against a live database; skips when none is reachable.
    #[tokio::test]
    async fn movie_user_score_crud() {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return;
        }
        let db = match db::connect().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {}", e);
                return;
            }
        };
        if let Err(e) = migration::Migrator::up(&db, None).await {
            eprintln!("skip: migrate up failed: {}", e);
            return;
        }

        let m = movie::create(&db, "Blade Runner").await.expect("create movie");
        assert_eq!(m.score, 0.0);
        assert_eq!(m.count, 0);

        let found = movie::Entity::find_by_id(m.id)
            .one(&db)
            .await
            .expect("find movie")
            .expect("movie present");
        assert_eq!(found.title, "Blade Runner");

        let username = format!("it_{}@example.com", Utc::now().timestamp_micros());
        let u = user::create(&db, &username, "$argon2id$stub").await.expect("create user");
        assert_eq!(user::find_by_username(&db, &username).await.unwrap().unwrap().id, u.id);

        let s = score::ActiveModel {
            user_id: Set(u.id),
            movie_id: Set(m.id),
            value: Set(4.0),
        };
        s.insert(&db).await.expect("insert score");

        // RESTRICT on the movie FK: a scored movie must not be deletable
        let res = movie::Entity::delete_by_id(m.id).exec(&db).await;
        assert!(res.is_err(), "deleting a scored movie should violate the FK");

        // cleanup in dependency order
        score::Entity::delete_by_id((u.id, m.id)).exec(&db).await.expect("delete score");
        movie::Entity::delete_by_id(m.id).exec(&db).await.expect("delete movie");
        user::Entity::delete_by_id(u.id).exec(&db).await.expect("delete user");
    }
}
