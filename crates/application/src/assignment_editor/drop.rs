use super::*;

impl AssignmentEditor {
    /// Marks the start of a drag gesture over the drop zone.
    pub fn begin_drop(&mut self) -> AppResult<()> {
        self.require_graph()?;
        if self.phase == InteractionPhase::Idle {
            self.set_phase(InteractionPhase::DropPending);
        }

        Ok(())
    }

    /// Abandons a drag gesture before anything was dropped.
    pub fn cancel_drop(&mut self) {
        if self.phase == InteractionPhase::DropPending {
            self.set_phase(InteractionPhase::Idle);
        }
    }

    /// Assigns a dropped item to the subject.
    ///
    /// Rejections (unsaved subject, unknown item, wrong member kind, duplicate)
    /// never reach the store. The snapshot changes only after the store
    /// confirmed the assignment, and takes the member as the store returned
    /// it rather than as it was dropped. The editor is idle again either way.
    pub async fn item_dropped(&mut self, item: DroppedItem) -> AppResult<DropCommitted> {
        self.set_phase(InteractionPhase::DropPending);
        let result = self.commit_drop(item).await;
        self.set_phase(InteractionPhase::Idle);

        if let Err(rejection) = &result {
            log_rejection("drop", rejection);
        }

        result
    }

    async fn commit_drop(&mut self, item: DroppedItem) -> AppResult<DropCommitted> {
        let request = {
            let graph = self.require_graph()?;
            let subject = graph.subject().persisted_ref()?;

            let member = match item {
                DroppedItem::Assignment(key) => key,
                DroppedItem::Unknown { type_name } => {
                    return Err(AppError::Validation(format!(
                        "'{type_name}' items cannot be assigned to {} '{}'",
                        subject.kind.as_str(),
                        graph.subject().caption
                    )));
                }
            };

            let expected = subject.kind.member_kind();
            if member.kind() != expected {
                return Err(AppError::Validation(format!(
                    "only {} items can be assigned to {} '{}'",
                    expected.as_str(),
                    subject.kind.as_str(),
                    graph.subject().caption
                )));
            }

            if graph.contains(&member) {
                return Err(AppError::Validation(format!(
                    "{} is already assigned to {} '{}'",
                    member,
                    subject.kind.as_str(),
                    graph.subject().caption
                )));
            }

            AssignmentRequest {
                subject,
                subject_caption: graph.subject().caption.clone(),
                member,
            }
        };

        self.set_phase(InteractionPhase::Committing);
        let stored = self.gateway.assign(&request).await.map_err(|error| {
            remote_failure(
                &format!("assigning {} to {}", request.member, request.subject),
                error,
            )
        })?;
        if stored.key != request.member {
            return Err(AppError::Remote(format!(
                "store confirmed {} while {} was requested",
                stored.key, request.member
            )));
        }

        let graph = self.require_graph_mut()?;
        let payload = graph.add_member(stored)?;
        let revision = graph.revision();

        info!(
            subject = %request.subject,
            member = %request.member,
            revision,
            "assignment committed"
        );

        self.clear_selection();
        self.publish_update(&payload);
        self.view.publish(GraphViewEvent::SaveConfirmed {
            member: request.member.clone(),
        });

        Ok(DropCommitted {
            member: request.member,
            payload,
            revision,
        })
    }
}
