mod common;

use schoolhub_server::{
    errors::AppError,
    models::{
        domain::{ResourceType, User, UserRole},
        dto::request::{
            CreateClassRequest, CreateResourceRequest, CreateSubjectRequest, CreateTermRequest,
            UpdateClassRequest, UpdateSubjectRequest, UpdateTermRequest,
        },
    },
    repositories::UserRepository,
};

fn class(name: &str, order: i32) -> CreateClassRequest {
    CreateClassRequest {
        name: name.to_string(),
        description: None,
        order,
    }
}

fn term(name: &str, order: i32) -> CreateTermRequest {
    CreateTermRequest {
        name: name.to_string(),
        order,
    }
}

fn subject(name: &str, code: &str) -> CreateSubjectRequest {
    CreateSubjectRequest {
        name: name.to_string(),
        code: code.to_string(),
        order: None,
    }
}

#[tokio::test]
async fn colliding_class_order_leaves_data_unchanged() {
    let (state, _) = common::test_state();
    let catalog = &state.catalog_service;

    let six = catalog.create_class(class("Class VI", 9)).await.expect("create");
    let seven = catalog.create_class(class("Class VII", 10)).await.expect("create");

    let result = catalog
        .update_class(
            &seven.id,
            UpdateClassRequest {
                order: Some(9),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::DuplicateOrder { order: 9, .. })));

    let classes = catalog.list_classes().await.expect("list");
    let orders: Vec<(String, i32)> = classes.into_iter().map(|c| (c.id, c.order)).collect();
    assert_eq!(orders, vec![(six.id, 9), (seven.id, 10)]);
}

#[tokio::test]
async fn duplicate_class_name_is_rejected() {
    let (state, _) = common::test_state();
    let catalog = &state.catalog_service;

    catalog.create_class(class("Class VI", 9)).await.expect("create");
    let result = catalog.create_class(class("Class VI", 12)).await;

    assert!(matches!(result, Err(AppError::DuplicateName { entity: "class", .. })));
}

#[tokio::test]
async fn no_op_updates_succeed_at_every_level() {
    let (state, _) = common::test_state();
    let catalog = &state.catalog_service;

    let class = catalog.create_class(class("Class VI", 9)).await.expect("class");
    let term = catalog.create_term(&class.id, term("Term 1", 1)).await.expect("term");
    let subject = catalog
        .create_subject(&term.id, subject("Mathematics", "MATH-6"))
        .await
        .expect("subject");

    catalog
        .update_class(
            &class.id,
            UpdateClassRequest {
                name: Some("Class VI".to_string()),
                order: Some(9),
                description: None,
            },
        )
        .await
        .expect("class no-op update");
    catalog
        .update_term(
            &term.id,
            UpdateTermRequest {
                name: Some("Term 1".to_string()),
                order: Some(1),
            },
        )
        .await
        .expect("term no-op update");
    catalog
        .update_subject(
            &subject.id,
            UpdateSubjectRequest {
                code: Some("MATH-6".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("subject no-op update");
}

#[tokio::test]
async fn term_order_conflicts_only_within_the_same_class() {
    let (state, _) = common::test_state();
    let catalog = &state.catalog_service;

    let six = catalog.create_class(class("Class VI", 9)).await.expect("class");
    let seven = catalog.create_class(class("Class VII", 10)).await.expect("class");

    catalog.create_term(&six.id, term("Term 1", 1)).await.expect("term");
    catalog
        .create_term(&seven.id, term("Term 1", 1))
        .await
        .expect("same order in another class");

    let clash = catalog.create_term(&six.id, term("Spring", 1)).await;
    assert!(matches!(clash, Err(AppError::DuplicateOrder { entity: "term", order: 1 })));
}

#[tokio::test]
async fn subject_code_update_into_sibling_code_is_rejected() {
    let (state, _) = common::test_state();
    let catalog = &state.catalog_service;

    let class = catalog.create_class(class("Class VI", 9)).await.expect("class");
    let term = catalog.create_term(&class.id, term("Term 1", 1)).await.expect("term");
    catalog
        .create_subject(&term.id, subject("Mathematics", "MATH-6"))
        .await
        .expect("subject");
    let science = catalog
        .create_subject(&term.id, subject("Science", "SCI-6"))
        .await
        .expect("subject");

    let result = catalog
        .update_subject(
            &science.id,
            UpdateSubjectRequest {
                code: Some("MATH-6".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::DuplicateCode { code }) if code == "MATH-6"));
}

#[tokio::test]
async fn unknown_parents_are_rejected_immediately() {
    let (state, _) = common::test_state();

    let term_result = state
        .catalog_service
        .create_term("missing-class", term("Term 1", 1))
        .await;
    assert!(matches!(
        term_result,
        Err(AppError::UnknownReference { entity: "class", .. })
    ));

    let resource_result = state
        .resource_service
        .create_resource(
            "missing-subject",
            CreateResourceRequest {
                title: "Syllabus".to_string(),
                description: None,
                resource_type: ResourceType::Syllabus,
                is_published: None,
            },
            "teacher",
            None,
        )
        .await;
    assert!(matches!(resource_result, Err(AppError::UnknownSubject(_))));
}

#[tokio::test]
async fn deletes_are_refused_with_dependent_counts_then_succeed_bottom_up() {
    let (state, repositories) = common::test_state();
    let catalog = &state.catalog_service;

    let class = catalog.create_class(class("Class VI", 9)).await.expect("class");
    let term_one = catalog.create_term(&class.id, term("Term 1", 1)).await.expect("term");
    let term_two = catalog.create_term(&class.id, term("Term 2", 2)).await.expect("term");
    let maths = catalog
        .create_subject(&term_one.id, subject("Mathematics", "MATH-6"))
        .await
        .expect("subject");
    let resource = state
        .resource_service
        .create_resource(
            &maths.id,
            CreateResourceRequest {
                title: "Syllabus".to_string(),
                description: None,
                resource_type: ResourceType::Syllabus,
                is_published: Some(true),
            },
            "teacher",
            None,
        )
        .await
        .expect("resource");
    let learner = repositories
        .users
        .create(User::new("asha", "Asha Rao", UserRole::Student, Some(&class.id)))
        .await
        .expect("user");

    match catalog.delete_class(&class.id).await {
        Err(AppError::HasDependents { entity, counts }) => {
            assert_eq!(entity, "class");
            assert_eq!(counts.terms, 2);
            assert_eq!(counts.subjects, 1);
            assert_eq!(counts.users, 1);
        }
        other => panic!("expected HasDependents, got {:?}", other),
    }

    match catalog.delete_term(&term_one.id).await {
        Err(AppError::HasDependents { counts, .. }) => assert_eq!(counts.subjects, 1),
        other => panic!("expected HasDependents, got {:?}", other),
    }

    match catalog.delete_subject(&maths.id).await {
        Err(AppError::HasDependents { counts, .. }) => assert_eq!(counts.resources, 1),
        other => panic!("expected HasDependents, got {:?}", other),
    }

    // A term with no subjects goes straight away.
    catalog.delete_term(&term_two.id).await.expect("empty term");

    state
        .resource_service
        .delete_resource(&resource.id)
        .await
        .expect("resource");
    catalog.delete_subject(&maths.id).await.expect("subject");
    catalog.delete_term(&term_one.id).await.expect("term");

    match catalog.delete_class(&class.id).await {
        Err(AppError::HasDependents { counts, .. }) => {
            assert_eq!(counts.users, 1);
            assert_eq!(counts.terms, 0);
        }
        other => panic!("expected HasDependents, got {:?}", other),
    }

    assert!(learner.class_id.is_some());
}

#[tokio::test]
async fn empty_class_is_deleted() {
    let (state, _) = common::test_state();
    let catalog = &state.catalog_service;

    let class = catalog.create_class(class("Class VI", 9)).await.expect("class");
    catalog.delete_class(&class.id).await.expect("delete");

    assert!(matches!(
        catalog.get_class(&class.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn subjects_list_in_stored_order_regardless_of_insertion() {
    let (state, _) = common::test_state();
    let catalog = &state.catalog_service;

    let class = catalog.create_class(class("Class VI", 9)).await.expect("class");
    let term = catalog.create_term(&class.id, term("Term 1", 1)).await.expect("term");

    for (name, code) in [("Science", "SCI"), ("English", "ENG"), ("Mathematics", "MATH")] {
        catalog
            .create_subject(&term.id, subject(name, code))
            .await
            .expect("subject");
    }

    let names: Vec<String> = catalog
        .list_subjects(&term.id)
        .await
        .expect("list")
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["English", "Mathematics", "Science"]);
}
