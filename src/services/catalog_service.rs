use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{catalog::sort_subjects, Class, DependentCounts, Subject, Term},
        dto::request::{
            CreateClassRequest, CreateSubjectRequest, CreateTermRequest, UpdateClassRequest,
            UpdateSubjectRequest, UpdateTermRequest,
        },
    },
    repositories::{
        ClassRepository, ResourceRepository, SubjectRepository, TermRepository, UserRepository,
    },
};

/// Class / Term / Subject store. Every mutation re-checks the ordering and
/// code invariants before writing; the unique indexes behind the
/// repositories close the remaining race window.
pub struct CatalogService {
    classes: Arc<dyn ClassRepository>,
    terms: Arc<dyn TermRepository>,
    subjects: Arc<dyn SubjectRepository>,
    resources: Arc<dyn ResourceRepository>,
    users: Arc<dyn UserRepository>,
}

fn refuse_if_dependents(entity: &'static str, id: &str, counts: DependentCounts) -> AppResult<()> {
    if counts.is_empty() {
        return Ok(());
    }
    log::warn!("Refusing to delete {} {}: it still owns {}", entity, id, counts);
    Err(AppError::HasDependents { entity, counts })
}

/// `None` clears an optional text field when the caller sends an empty string.
fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl CatalogService {
    pub fn new(
        classes: Arc<dyn ClassRepository>,
        terms: Arc<dyn TermRepository>,
        subjects: Arc<dyn SubjectRepository>,
        resources: Arc<dyn ResourceRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            classes,
            terms,
            subjects,
            resources,
            users,
        }
    }

    // ---- classes ----

    pub async fn list_classes(&self) -> AppResult<Vec<Class>> {
        self.classes.list().await
    }

    pub async fn get_class(&self, id: &str) -> AppResult<Class> {
        self.classes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Class with id '{}' not found", id)))
    }

    async fn ensure_class_slot_free(&self, name: &str, order: i32, self_id: Option<&str>) -> AppResult<()> {
        if let Some(existing) = self.classes.find_by_order(order).await? {
            if Some(existing.id.as_str()) != self_id {
                return Err(AppError::DuplicateOrder {
                    entity: "class",
                    order,
                });
            }
        }

        if let Some(existing) = self.classes.find_by_name(name).await? {
            if Some(existing.id.as_str()) != self_id {
                return Err(AppError::DuplicateName {
                    entity: "class",
                    name: name.to_string(),
                });
            }
        }

        Ok(())
    }

    pub async fn create_class(&self, request: CreateClassRequest) -> AppResult<Class> {
        request.validate()?;

        let name = request.name.trim();
        self.ensure_class_slot_free(name, request.order, None).await?;

        let description = request.description.and_then(non_empty);
        let class = Class::new(name, description.as_deref(), request.order);
        let class = self.classes.create(class).await?;

        log::info!("Created class {} '{}' at order {}", class.id, class.name, class.order);
        Ok(class)
    }

    pub async fn update_class(&self, id: &str, request: UpdateClassRequest) -> AppResult<Class> {
        request.validate()?;

        let mut class = self.get_class(id).await?;

        if let Some(name) = request.name {
            class.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            class.description = non_empty(description);
        }
        if let Some(order) = request.order {
            class.order = order;
        }

        self.ensure_class_slot_free(&class.name, class.order, Some(id))
            .await?;

        class.modified_at = Some(Utc::now());
        self.classes.update(class).await
    }

    pub async fn class_dependents(&self, id: &str) -> AppResult<DependentCounts> {
        let terms = self.terms.count_by_class(id).await?;

        let subjects = if terms == 0 {
            0
        } else {
            let term_ids: Vec<String> = self
                .terms
                .list_by_class(id)
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect();
            self.subjects.count_by_terms(&term_ids).await?
        };

        Ok(DependentCounts {
            users: self.users.count_by_class(id).await?,
            terms,
            subjects,
            ..Default::default()
        })
    }

    pub async fn delete_class(&self, id: &str) -> AppResult<()> {
        self.get_class(id).await?;

        let counts = self.class_dependents(id).await?;
        refuse_if_dependents("class", id, counts)?;

        self.classes.delete(id).await?;
        log::info!("Deleted class {}", id);
        Ok(())
    }

    // ---- terms ----

    pub async fn list_terms(&self, class_id: &str) -> AppResult<Vec<Term>> {
        self.get_class(class_id).await?;
        self.terms.list_by_class(class_id).await
    }

    pub async fn get_term(&self, id: &str) -> AppResult<Term> {
        self.terms
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Term with id '{}' not found", id)))
    }

    async fn ensure_term_slot_free(
        &self,
        class_id: &str,
        name: &str,
        order: i32,
        self_id: Option<&str>,
    ) -> AppResult<()> {
        if let Some(existing) = self.terms.find_by_order(class_id, order).await? {
            if Some(existing.id.as_str()) != self_id {
                return Err(AppError::DuplicateOrder {
                    entity: "term",
                    order,
                });
            }
        }

        if let Some(existing) = self.terms.find_by_name(class_id, name).await? {
            if Some(existing.id.as_str()) != self_id {
                return Err(AppError::DuplicateName {
                    entity: "term",
                    name: name.to_string(),
                });
            }
        }

        Ok(())
    }

    pub async fn create_term(&self, class_id: &str, request: CreateTermRequest) -> AppResult<Term> {
        request.validate()?;

        if self.classes.find_by_id(class_id).await?.is_none() {
            return Err(AppError::UnknownReference {
                entity: "class",
                id: class_id.to_string(),
            });
        }

        let name = request.name.trim();
        self.ensure_term_slot_free(class_id, name, request.order, None)
            .await?;

        let term = self.terms.create(Term::new(class_id, name, request.order)).await?;

        log::info!("Created term {} '{}' in class {}", term.id, term.name, class_id);
        Ok(term)
    }

    pub async fn update_term(&self, id: &str, request: UpdateTermRequest) -> AppResult<Term> {
        request.validate()?;

        let mut term = self.get_term(id).await?;

        if let Some(name) = request.name {
            term.name = name.trim().to_string();
        }
        if let Some(order) = request.order {
            term.order = order;
        }

        self.ensure_term_slot_free(&term.class_id, &term.name, term.order, Some(id))
            .await?;

        term.modified_at = Some(Utc::now());
        self.terms.update(term).await
    }

    pub async fn delete_term(&self, id: &str) -> AppResult<()> {
        self.get_term(id).await?;

        let counts = DependentCounts {
            subjects: self.subjects.count_by_term(id).await?,
            ..Default::default()
        };
        refuse_if_dependents("term", id, counts)?;

        self.terms.delete(id).await?;
        log::info!("Deleted term {}", id);
        Ok(())
    }

    // ---- subjects ----

    pub async fn list_subjects(&self, term_id: &str) -> AppResult<Vec<Subject>> {
        self.get_term(term_id).await?;
        let mut subjects = self.subjects.list_by_term(term_id).await?;
        sort_subjects(&mut subjects);
        Ok(subjects)
    }

    pub async fn get_subject(&self, id: &str) -> AppResult<Subject> {
        self.subjects
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subject with id '{}' not found", id)))
    }

    async fn ensure_subject_code_free(
        &self,
        term_id: &str,
        code: &str,
        self_id: Option<&str>,
    ) -> AppResult<()> {
        if let Some(existing) = self.subjects.find_by_code(term_id, code).await? {
            if Some(existing.id.as_str()) != self_id {
                return Err(AppError::DuplicateCode {
                    code: code.to_string(),
                });
            }
        }
        Ok(())
    }

    pub async fn create_subject(
        &self,
        term_id: &str,
        request: CreateSubjectRequest,
    ) -> AppResult<Subject> {
        request.validate()?;

        if self.terms.find_by_id(term_id).await?.is_none() {
            return Err(AppError::UnknownReference {
                entity: "term",
                id: term_id.to_string(),
            });
        }

        self.ensure_subject_code_free(term_id, &request.code, None)
            .await?;

        let subject = Subject::new(
            term_id,
            request.name.trim(),
            &request.code,
            request.order.unwrap_or(0),
        );
        let subject = self.subjects.create(subject).await?;

        log::info!("Created subject {} '{}' in term {}", subject.id, subject.code, term_id);
        Ok(subject)
    }

    pub async fn update_subject(
        &self,
        id: &str,
        request: UpdateSubjectRequest,
    ) -> AppResult<Subject> {
        request.validate()?;

        let mut subject = self.get_subject(id).await?;

        if let Some(name) = request.name {
            subject.name = name.trim().to_string();
        }
        if let Some(code) = request.code {
            subject.code = code;
        }
        if let Some(order) = request.order {
            subject.order = order;
        }

        self.ensure_subject_code_free(&subject.term_id, &subject.code, Some(id))
            .await?;

        subject.modified_at = Some(Utc::now());
        self.subjects.update(subject).await
    }

    pub async fn delete_subject(&self, id: &str) -> AppResult<()> {
        self.get_subject(id).await?;

        let counts = DependentCounts {
            resources: self.resources.count_by_subject(id).await?,
            ..Default::default()
        };
        refuse_if_dependents("subject", id, counts)?;

        self.subjects.delete(id).await?;
        log::info!("Deleted subject {}", id);
        Ok(())
    }
}
