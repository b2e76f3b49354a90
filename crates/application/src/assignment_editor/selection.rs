use super::*;

impl AssignmentEditor {
    /// Toggles a rendered node in the selection.
    ///
    /// Clicks made on an older payload are rejected as stale and leave the
    /// selection untouched. Returns the selection event, if the node became
    /// selected.
    pub fn toggle_select(&mut self, click: NodeClick) -> AppResult<Option<NodeSelected>> {
        let graph = self.require_graph()?;
        if click.revision != graph.revision() {
            return Err(AppError::StaleReference(format!(
                "click on revision {} but the graph is at revision {}",
                click.revision,
                graph.revision()
            )));
        }

        if graph.node_id_at(click.slot) != Some(click.node) {
            return Err(AppError::StaleReference(format!(
                "slot {} does not hold node {} in the current graph",
                click.slot, click.node
            )));
        }

        let selected = self.selection.toggle(click.slot, click.node);
        if let Some(selected) = selected {
            self.view.publish(GraphViewEvent::NodeSelected(selected));
        }

        Ok(selected)
    }
}
