use super::*;

struct UnassignTarget {
    node: NodeId,
    request: AssignmentRequest,
}

impl AssignmentEditor {
    /// Unassigns every selected member from the subject.
    ///
    /// The batch is rejected as a whole, before any remote call, when the
    /// selection is empty, contains the root subject, or points at nodes
    /// that are no longer rendered. Otherwise one unassign call is issued per
    /// member in ascending slot order; failures do not roll back earlier
    /// successes. The selection is cleared once the batch ran.
    pub async fn delete_selected(&mut self) -> AppResult<DeleteOutcome> {
        if self.selection.is_empty() {
            let rejection = AppError::Precondition("no node selected".to_owned());
            log_rejection("delete", &rejection);
            return Err(rejection);
        }

        self.set_phase(InteractionPhase::DeletePending);
        let result = self.commit_delete().await;
        self.set_phase(InteractionPhase::Idle);

        if let Err(rejection) = &result {
            log_rejection("delete", rejection);
        }

        result
    }

    async fn commit_delete(&mut self) -> AppResult<DeleteOutcome> {
        self.set_phase(InteractionPhase::Validating);
        let targets = match self.resolve_targets() {
            Ok(targets) => targets,
            Err(rejection @ AppError::StaleReference(_)) => {
                self.clear_selection();
                return Err(rejection);
            }
            Err(rejection) => return Err(rejection),
        };

        self.set_phase(InteractionPhase::Committing);
        let mut removed_nodes = Vec::with_capacity(targets.len());
        let mut removed = Vec::with_capacity(targets.len());
        let mut failures = Vec::new();

        for target in targets {
            match self.gateway.unassign(&target.request).await {
                Ok(()) => {
                    removed_nodes.push(target.node);
                    removed.push(target.request.member);
                }
                Err(failure) => {
                    let failure = remote_failure(
                        &format!(
                            "unassigning {} from {}",
                            target.request.member, target.request.subject
                        ),
                        failure,
                    );
                    warn!(
                        subject = %target.request.subject,
                        member = %target.request.member,
                        error = %failure,
                        "unassignment failed"
                    );
                    failures.push(UnassignFailure {
                        member: target.request.member,
                        message: failure.to_string(),
                    });
                }
            }
        }

        let graph = self.require_graph_mut()?;
        let payload = if removed_nodes.is_empty() {
            graph.payload_json()?
        } else {
            graph.delete_nodes(&removed_nodes)?
        };

        info!(
            subject = %graph.subject().caption,
            removed = removed.len(),
            failed = failures.len(),
            revision = graph.revision(),
            "unassignment batch finished"
        );

        self.clear_selection();
        self.publish_update(&payload);

        if failures.is_empty() {
            Ok(DeleteOutcome::Committed { removed, payload })
        } else {
            Ok(DeleteOutcome::PartialFailure {
                removed,
                failures,
                payload,
            })
        }
    }

    fn resolve_targets(&self) -> AppResult<Vec<UnassignTarget>> {
        let graph = self.require_graph()?;
        if self.selection.contains_node(NodeId::ROOT) {
            return Err(root_in_batch(graph.subject()));
        }

        let mut members = Vec::with_capacity(self.selection.len());
        for (slot, node) in self.selection.iter() {
            match graph.node(node) {
                Some(NodeRef::Subject(subject)) => return Err(root_in_batch(subject)),
                Some(NodeRef::Member(member)) => members.push((node, member)),
                None => {
                    return Err(AppError::StaleReference(format!(
                        "selected slot {slot} refers to node {node}, which is no longer rendered"
                    )));
                }
            }
        }

        let subject = graph.subject().persisted_ref()?;
        Ok(members
            .into_iter()
            .map(|(node, member)| UnassignTarget {
                node,
                request: AssignmentRequest {
                    subject,
                    subject_caption: graph.subject().caption.clone(),
                    member: member.key.clone(),
                },
            })
            .collect())
    }
}

fn root_in_batch(subject: &SubjectNode) -> AppError {
    AppError::Precondition(format!(
        "{} '{}' is the root of this graph and cannot be unassigned; deselect it and retry",
        subject.kind.as_str(),
        subject.caption
    ))
}
