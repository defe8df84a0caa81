use admissions::workflows::admissions::{
    ApplicationId, ApplicationRecord, ApplicationRepository, FormKind, FormRecord, FormRepository,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            guard.insert(record.application_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Sub-form rows keyed by application and form kind; a second write replaces the first.
#[derive(Default, Clone)]
pub(crate) struct InMemoryFormRepository {
    records: Arc<Mutex<HashMap<(ApplicationId, FormKind), FormRecord>>>,
}

impl FormRepository for InMemoryFormRepository {
    fn upsert(&self, record: FormRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("form mutex poisoned");
        guard.insert((record.application_id.clone(), record.kind()), record);
        Ok(())
    }

    fn fetch(
        &self,
        id: &ApplicationId,
        kind: FormKind,
    ) -> Result<Option<FormRecord>, RepositoryError> {
        let guard = self.records.lock().expect("form mutex poisoned");
        Ok(guard.get(&(id.clone(), kind)).cloned())
    }

    fn exists(&self, id: &ApplicationId, kind: FormKind) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("form mutex poisoned");
        Ok(guard.contains_key(&(id.clone(), kind)))
    }
}
