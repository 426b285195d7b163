use super::port::{InputId, OutputId};
use slotmap::SecondaryMap;

/// Edges between ports, stored as a forward map from each input to its single
/// upstream output plus a reverse index from each output to its subscribers.
/// Both directions are only ever changed together, through `link` and `unlink`.
#[derive(Debug, Default)]
pub struct Wiring {
    upstream: SecondaryMap<InputId, OutputId>,
    subscribers: SecondaryMap<OutputId, Vec<InputId>>,
}

impl Wiring {
    pub fn new() -> Wiring {
        Wiring::default()
    }

    /// Wires `input` to `output`, replacing any previous upstream. Returns the
    /// output it was previously wired to.
    pub fn link(&mut self, output: OutputId, input: InputId) -> Option<OutputId> {
        let previous = self.unlink(input);
        self.upstream.insert(input, output);
        match self.subscribers.get_mut(output) {
            Some(list) => list.push(input),
            None => {
                self.subscribers.insert(output, vec![input]);
            }
        }
        previous
    }

    /// Removes the edge into `input`, if there is one.
    pub fn unlink(&mut self, input: InputId) -> Option<OutputId> {
        let output = self.upstream.remove(input)?;
        if let Some(list) = self.subscribers.get_mut(output) {
            list.retain(|sub| *sub != input);
            if list.is_empty() {
                self.subscribers.remove(output);
            }
        }
        Some(output)
    }

    /// Removes every edge out of `output` and returns the inputs it fed, in
    /// subscription order.
    pub fn detach_output(&mut self, output: OutputId) -> Vec<InputId> {
        let inputs = self.subscribers.remove(output).unwrap_or_default();
        for input in &inputs {
            self.upstream.remove(*input);
        }
        inputs
    }

    pub fn upstream(&self, input: InputId) -> Option<OutputId> {
        self.upstream.get(input).copied()
    }

    pub fn subscribers(&self, output: OutputId) -> &[InputId] {
        self.subscribers
            .get(output)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Number of wires.
    pub fn len(&self) -> usize {
        self.upstream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upstream.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ports() -> (SlotMap<OutputId, ()>, SlotMap<InputId, ()>) {
        (SlotMap::with_key(), SlotMap::with_key())
    }

    #[test]
    fn keeps_both_directions_in_step() {
        let (mut outputs, mut inputs) = ports();
        let (o1, o2) = (outputs.insert(()), outputs.insert(()));
        let (i1, i2) = (inputs.insert(()), inputs.insert(()));
        let mut wiring = Wiring::new();

        assert_eq!(wiring.link(o1, i1), None);
        assert_eq!(wiring.link(o1, i2), None);
        assert_eq!(wiring.subscribers(o1), &[i1, i2]);

        assert_eq!(wiring.link(o2, i1), Some(o1));
        assert_eq!(wiring.subscribers(o1), &[i2]);
        assert_eq!(wiring.subscribers(o2), &[i1]);
        assert_eq!(wiring.upstream(i1), Some(o2));
        assert_eq!(wiring.len(), 2);
    }

    #[test]
    fn unlinking_is_idempotent() {
        let (mut outputs, mut inputs) = ports();
        let output = outputs.insert(());
        let input = inputs.insert(());
        let mut wiring = Wiring::new();
        wiring.link(output, input);

        assert_eq!(wiring.unlink(input), Some(output));
        assert_eq!(wiring.unlink(input), None);
        assert!(wiring.subscribers(output).is_empty());
        assert!(wiring.is_empty());
    }

    #[test]
    fn detaches_every_subscriber() {
        let (mut outputs, mut inputs) = ports();
        let output = outputs.insert(());
        let (i1, i2) = (inputs.insert(()), inputs.insert(()));
        let mut wiring = Wiring::new();
        wiring.link(output, i1);
        wiring.link(output, i2);

        assert_eq!(wiring.detach_output(output), vec![i1, i2]);
        assert_eq!(wiring.upstream(i1), None);
        assert_eq!(wiring.upstream(i2), None);
        assert!(wiring.detach_output(output).is_empty());
    }
}
