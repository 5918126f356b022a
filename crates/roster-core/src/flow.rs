//! One upload session, from file selection to processing result.
//!
//! [`UploadFlow`] owns the [`MappingMachine`] and awaits each gateway call
//! before taking the next step. Gateway failures are fed back into the
//! machine as messages, so the machine always ends up in the state the
//! failure calls for, and are then returned to the caller as [`FlowError`].
//!
//! Multi-source uploads bypass the machine: the files are checked, sent in
//! one request, and merged by the backend without a mapping step.

use std::time::{SystemTime, UNIX_EPOCH};

use roster_gateway::Gateway;
use roster_map::{
    MappingMachine, MappingPreset, Phase, PresetApplication, Readiness, SuggestionEngine,
    check_sources,
};
use roster_model::{
    CanonicalField, MergeResult, MultiUpload, ProcessingResult, SampleFormat, SessionContext,
    SessionId, UploadedFile,
};
use tracing::{Instrument, info, info_span, warn};

use crate::error::{FlowError, Result};

pub struct UploadFlow<G: Gateway> {
    gateway: G,
    machine: MappingMachine,
    context: SessionContext,
}

impl<G: Gateway> UploadFlow<G> {
    pub fn new(gateway: G, context: SessionContext) -> Self {
        Self {
            gateway,
            machine: MappingMachine::new(),
            context,
        }
    }

    pub fn machine(&self) -> &MappingMachine {
        &self.machine
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Select `file` and upload it for introspection.
    ///
    /// A rejected file never reaches the gateway. On success the machine is
    /// in mapping, seeded from the server's suggestions.
    pub async fn select_and_upload(&mut self, file: UploadedFile) -> Result<Phase> {
        let ticket = self.machine.select_file(file)?;
        let span = info_span!(
            "upload",
            file = %ticket.file.name,
            size = ticket.file.size,
            user = %self.context.describe(),
            college = self.context.college_scope().unwrap_or("-"),
        );
        match self.gateway.upload_file(&ticket.file).instrument(span).await {
            Ok(introspection) => Ok(self.machine.complete_upload(&ticket, Ok(introspection))?),
            Err(err) => {
                self.machine.complete_upload(&ticket, Err(err.to_string()))?;
                Err(FlowError::Upload(err))
            }
        }
    }

    /// Set or clear the target of one raw column.
    pub fn edit(&mut self, column: &str, field: Option<CanonicalField>) -> Result<Readiness> {
        Ok(self.machine.set_mapping(column, field)?)
    }

    pub fn apply_preset(&mut self, preset: &MappingPreset) -> Result<PresetApplication> {
        let application = preset.apply_to(&mut self.machine)?;
        info!(
            applied = application.applied.len(),
            skipped = application.skipped.len(),
            "mapping preset applied"
        );
        Ok(application)
    }

    pub fn apply_local_suggestions(
        &mut self,
        engine: &SuggestionEngine,
    ) -> Result<Vec<(String, CanonicalField)>> {
        Ok(self.machine.apply_local_suggestions(engine)?)
    }

    /// Submit the current mapping and wait for the processing result.
    ///
    /// Only a result with `success = true` is returned as `Ok`. Any failure
    /// leaves the machine back in mapping with the mapping unchanged.
    pub async fn submit_and_process(&mut self) -> Result<ProcessingResult> {
        let ticket = self.machine.submit()?;
        let span = info_span!(
            "process",
            session = %ticket.session_id,
            mapped = ticket.mapping.len(),
            user = %self.context.describe(),
            college = self.context.college_scope().unwrap_or("-"),
        );
        let outcome = self
            .gateway
            .process_data(&ticket.mapping, &ticket.session_id, &ticket.file)
            .instrument(span)
            .await;
        match outcome {
            Ok(result) if result.success => {
                self.machine
                    .complete_processing(&ticket, Ok(result.clone()))?;
                Ok(result)
            }
            Ok(result) => {
                let message = result.failure_message();
                self.machine.complete_processing(&ticket, Ok(result))?;
                Err(FlowError::ProcessingRejected(message))
            }
            Err(err) => {
                self.machine
                    .complete_processing(&ticket, Err(err.to_string()))?;
                Err(FlowError::Processing(err))
            }
        }
    }

    /// Drop the current session.
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// Upload per-source files to be merged by `student_id`.
    ///
    /// Every file passes the same check as a single upload; a rejected set
    /// never reaches the gateway. The session id is generated here from the
    /// context's college and the current time.
    pub async fn multi_upload(&self, upload: &MultiUpload) -> Result<MergeResult> {
        check_sources(upload)?;
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let session_id = SessionId::for_multi_upload(self.context.college.as_deref(), millis);
        let span = info_span!(
            "multi_upload",
            session = %session_id,
            files = upload.len(),
            user = %self.context.describe(),
        );
        let result = self
            .gateway
            .multi_upload(upload, &session_id)
            .instrument(span)
            .await
            .map_err(FlowError::MultiUpload)?;
        if !result.success {
            let message = if result.message.is_empty() {
                "Failed to store data in system".to_string()
            } else {
                result.message.clone()
            };
            warn!(session = %session_id, error = %message, "multi-file upload rejected");
            return Err(FlowError::ProcessingRejected(message));
        }
        info!(
            session = %result.session_id,
            students = result.matching_results.total_students,
            stored = result.stored_count,
            "sources merged"
        );
        Ok(result)
    }

    /// Reference layout for new uploads.
    pub async fn sample_format(&self) -> Result<SampleFormat> {
        let span = info_span!("sample_format");
        Ok(self.gateway.sample_format().instrument(span).await?)
    }
}
