#[cfg(test)]
mod tests {
    use crate::common::database;
    use convicare::error::{AuthError, Error};
    use convicare::model::{NewUser, Role, UserUpdate};
    use convicare::repository::Repository;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            name: "Dra. Ruiz".to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn unique_email_index_maps_to_duplicate_email() {
        let Some(db) = database().await else { return };
        let repository = &db.repository;

        repository
            .insert_user(&new_user("ruiz@clinic.co", Role::Medico))
            .await
            .unwrap();

        let err = repository
            .insert_user(&new_user("ruiz@clinic.co", Role::Admin))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Auth(AuthError::DuplicateEmail { ref email }) if email == "ruiz@clinic.co"
        ));
        assert_eq!(repository.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn roles_are_stored_as_text() {
        let Some(db) = database().await else { return };
        let repository = &db.repository;

        let nurse = Role::Other("enfermero".to_string());
        let id = repository
            .insert_user(&new_user("ana@clinic.co", nurse.clone()))
            .await
            .unwrap();

        let user = repository
            .find_user_by_email("ana@clinic.co")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, nurse);
        assert_eq!(user.password_hash, "$2b$04$hash");
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let Some(db) = database().await else { return };
        let repository = &db.repository;

        let ruiz = repository
            .insert_user(&new_user("ruiz@clinic.co", Role::Medico))
            .await
            .unwrap();
        let ana = repository
            .insert_user(&new_user("ana@clinic.co", Role::Medico))
            .await
            .unwrap();

        let update = UserUpdate {
            name: "Ana Maria".to_string(),
            email: "ruiz@clinic.co".to_string(),
            role: Role::Admin,
        };
        assert!(!repository.update_user(999, &update).await.unwrap());

        let err = repository.update_user(ana, &update).await.unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::DuplicateEmail { .. })));

        let update = UserUpdate {
            email: "ana.maria@clinic.co".to_string(),
            ..update
        };
        assert!(repository.update_user(ana, &update).await.unwrap());
        let user = repository.find_user(ana).await.unwrap().unwrap();
        assert_eq!(user.name, "Ana Maria");
        assert_eq!(user.role, Role::Admin);

        assert!(repository.delete_user(ruiz).await.unwrap());
        assert!(!repository.delete_user(ruiz).await.unwrap());
        assert!(repository.find_user(ruiz).await.unwrap().is_none());
    }
}
