//! The transition engine

use std::sync::Arc;

use async_stream::try_stream;
use futures::{Stream, StreamExt, pin_mut};
use tracing::{debug, info, warn};

use selfrag_core::{
    AdequacyOracle, AnswerGenerator, GroundednessOracle, QueryRewriter, RagError, RelevanceOracle,
    Result, Retriever, WorkflowState,
};

use crate::config::WorkflowConfig;
use crate::state::{RunOutcome, SessionState, WorkflowEvent};

/// The control loop.
///
/// Owns no global state: collaborators are explicit dependencies injected at
/// construction, and each run threads its own [`SessionState`]. One
/// `Workflow` can serve concurrent runs against the same read-only index.
pub struct Workflow {
    retriever: Arc<dyn Retriever>,
    relevance: Arc<dyn RelevanceOracle>,
    groundedness: Arc<dyn GroundednessOracle>,
    adequacy: Arc<dyn AdequacyOracle>,
    rewriter: Arc<dyn QueryRewriter>,
    generator: Arc<dyn AnswerGenerator>,
    config: WorkflowConfig,
}

impl Workflow {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        relevance: Arc<dyn RelevanceOracle>,
        groundedness: Arc<dyn GroundednessOracle>,
        adequacy: Arc<dyn AdequacyOracle>,
        rewriter: Arc<dyn QueryRewriter>,
        generator: Arc<dyn AnswerGenerator>,
        config: WorkflowConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            retriever,
            relevance,
            groundedness,
            adequacy,
            rewriter,
            generator,
            config,
        })
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Runs the loop to completion, discarding intermediate trace events.
    pub async fn run(&self, question: impl Into<String>) -> Result<RunOutcome> {
        let stream = self.stream(question);
        pin_mut!(stream);

        let mut outcome = None;
        while let Some(event) = stream.next().await {
            if let WorkflowEvent::Completed(result) = event? {
                outcome = Some(result);
            }
        }

        outcome.ok_or_else(|| {
            RagError::step(WorkflowState::Abort, "trace stream ended without completion")
        })
    }

    /// Lazy trace of one run: a `Transition` per executed node, then exactly
    /// one `Completed`. A collaborator failure ends the stream as an `Err`
    /// item and the run terminates; the stream is not restartable, a new
    /// call is required to observe a run again.
    ///
    /// Every node boundary is an await point, so dropping the stream cancels
    /// the run cooperatively between steps.
    pub fn stream(
        &self,
        question: impl Into<String>,
    ) -> impl Stream<Item = Result<WorkflowEvent>> + '_ {
        let question = question.into();

        try_stream! {
            let mut session = SessionState::new(question);
            let mut current = WorkflowState::Retrieve;

            let outcome = loop {
                if session.steps_taken >= self.config.step_budget {
                    warn!(
                        steps = session.steps_taken,
                        "step budget exhausted, returning best available answer"
                    );
                    break finish(WorkflowState::Abort, session);
                }
                session.steps_taken += 1;

                match current {
                    WorkflowState::Retrieve => {
                        info!(step = session.steps_taken, question = %session.question, "retrieve");
                        session.documents = self
                            .retriever
                            .retrieve(&session.question, self.config.retrieve_k)
                            .await
                            .map_err(|e| e.in_state(WorkflowState::Retrieve))?;
                        yield WorkflowEvent::Transition(session.trace(WorkflowState::Retrieve));
                        current = WorkflowState::GradeDocuments;
                    }

                    WorkflowState::GradeDocuments => {
                        info!(step = session.steps_taken, "grade documents");
                        let candidates = std::mem::take(&mut session.documents);
                        let mut kept = Vec::with_capacity(candidates.len());
                        for passage in candidates {
                            let verdict = self
                                .relevance
                                .assess(&session.question, &passage)
                                .await
                                .map_err(|e| e.in_state(WorkflowState::GradeDocuments))?;
                            if verdict.is_relevant() {
                                kept.push(passage);
                            } else {
                                debug!("dropping irrelevant passage");
                            }
                        }
                        session.documents = kept;
                        yield WorkflowEvent::Transition(session.trace(WorkflowState::GradeDocuments));

                        current = if session.documents.is_empty() {
                            debug!("no relevant passages, rewriting query");
                            WorkflowState::TransformQuery
                        } else {
                            WorkflowState::Generate
                        };
                    }

                    WorkflowState::TransformQuery => {
                        info!(step = session.steps_taken, "transform query");
                        let rewritten = self
                            .rewriter
                            .rewrite(&session.question)
                            .await
                            .map_err(|e| e.in_state(WorkflowState::TransformQuery))?;
                        session.question = rewritten;
                        session.rewrite_count += 1;
                        // the old working set belongs to the old question
                        session.documents.clear();
                        yield WorkflowEvent::Transition(session.trace(WorkflowState::TransformQuery));
                        current = WorkflowState::Retrieve;
                    }

                    WorkflowState::Generate => {
                        info!(step = session.steps_taken, "generate");
                        let answer = self
                            .generator
                            .generate(&session.question, &session.documents)
                            .await
                            .map_err(|e| e.in_state(WorkflowState::Generate))?;
                        session.generation = Some(answer.clone());
                        session.generate_count += 1;
                        yield WorkflowEvent::Transition(session.trace(WorkflowState::Generate));

                        let grounded = self
                            .groundedness
                            .assess(&session.documents, &answer)
                            .await
                            .map_err(|e| e.in_state(WorkflowState::Generate))?;
                        if !grounded.is_grounded() {
                            debug!("generation not grounded, regenerating with same context");
                            current = WorkflowState::Generate;
                            continue;
                        }

                        let adequate = self
                            .adequacy
                            .assess(&session.question, &answer)
                            .await
                            .map_err(|e| e.in_state(WorkflowState::Generate))?;
                        if adequate.is_adequate() {
                            info!(steps = session.steps_taken, "answer accepted");
                            break finish(WorkflowState::Accept, session);
                        }
                        debug!("grounded but inadequate, rewriting query");
                        current = WorkflowState::TransformQuery;
                    }

                    // terminal states never re-enter the loop
                    WorkflowState::Accept | WorkflowState::Abort => {
                        break finish(current, session);
                    }
                }
            };

            yield WorkflowEvent::Completed(outcome);
        }
    }
}

fn finish(final_state: WorkflowState, session: SessionState) -> RunOutcome {
    RunOutcome {
        final_state,
        answer: session.generation,
        documents: session.documents,
        steps_taken: session.steps_taken,
        rewrite_count: session.rewrite_count,
        generate_count: session.generate_count,
    }
}
