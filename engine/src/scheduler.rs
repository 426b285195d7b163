use super::port::NodeId;
use huegraph_shared::node_value::NodeValue;
use std::collections::VecDeque;

/// One unit of deferred work.
#[derive(Debug)]
pub(crate) enum Task {
    /// Re-examine a node whose inputs or parameters changed.
    Notify { node: NodeId, force: bool },
    /// Run a node's compute function on the inputs captured when it was
    /// scheduled. Dropped if `version` is no longer the node's current one.
    Compute {
        node: NodeId,
        version: u64,
        inputs: Vec<Option<NodeValue>>,
    },
}

/// First-in first-out queue of tasks. Tasks enqueued while another task runs
/// wait until that task has finished. Only the engine thread touches it;
/// other threads go through `EngineHandle`.
#[derive(Default)]
pub(crate) struct TaskQueue {
    tasks: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> TaskQueue {
        TaskQueue::default()
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    pub fn pop(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn runs_tasks_in_order() {
        let mut nodes = SlotMap::<NodeId, ()>::with_key();
        let (a, b) = (nodes.insert(()), nodes.insert(()));
        let mut queue = TaskQueue::new();
        queue.push(Task::Notify { node: a, force: false });
        queue.push(Task::Compute {
            node: b,
            version: 3,
            inputs: vec![None],
        });
        assert_eq!(queue.len(), 2);
        assert!(matches!(queue.pop(), Some(Task::Notify { node, .. }) if node == a));
        assert!(matches!(queue.pop(), Some(Task::Compute { version: 3, .. })));
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }
}
