//! Selection-set editing: append, splice, remove, and deep copies.
//!
//! All edits keep the mark-don't-free discipline of the arenas: removing a
//! selection shrinks the owning set's reference list but leaves the node
//! itself in place.

use super::{
    Argument, Directive, Document, Field, FragmentSpread, InlineFragment, ObjectField,
    ObjectValue, Ref, Selection, SelectionSet, Value,
};

impl Document {
    pub fn add_selection_set(&mut self) -> Ref<SelectionSet> {
        self.selection_sets.push(SelectionSet::default())
    }

    /// Wraps a field/spread/fragment reference in a `Selection` arena node
    /// and appends it to the set.
    pub fn add_selection(&mut self, set: Ref<SelectionSet>, selection: Selection) {
        let selection_ref = self.selections.push(selection);
        self.selection_sets[set].selection_refs.push(selection_ref);
    }

    pub fn selection_set_is_empty(&self, set: Ref<SelectionSet>) -> bool {
        self.selection_sets[set].selection_refs.is_empty()
    }

    /// Removes the selection at `index` from the set's reference list.
    pub fn remove_selection_at(&mut self, set: Ref<SelectionSet>, index: usize) {
        self.selection_sets[set].selection_refs.remove(index);
    }

    /// Replaces the selection at `index` with the given selections, keeping
    /// the order of the rest of the set.
    pub fn replace_selection_at(
        &mut self,
        set: Ref<SelectionSet>,
        index: usize,
        replacements: Vec<Selection>,
    ) {
        let refs: Vec<Ref<Selection>> = replacements
            .into_iter()
            .map(|s| self.selections.push(s))
            .collect();
        let list = &mut self.selection_sets[set].selection_refs;
        list.splice(index..=index, refs);
    }

    /// Position of a selection reference inside a set, if it is still live.
    pub fn selection_index_of(
        &self,
        set: Ref<SelectionSet>,
        selection: Ref<Selection>,
    ) -> Option<usize> {
        self.selection_sets[set]
            .selection_refs
            .iter()
            .position(|&s| s == selection)
    }

    // -- deep copies -------------------------------------------------------
    //
    // Inlining the same fragment under several parents must not alias its
    // selection sets, otherwise a later merge under one parent would leak
    // into the other. Spans are shared; they are immutable.

    pub fn copy_selection_set(&mut self, set: Ref<SelectionSet>) -> Ref<SelectionSet> {
        let refs = self.selection_sets[set].selection_refs.clone();
        let mut copied = Vec::with_capacity(refs.len());
        for r in refs {
            let selection = self.copy_selection(self.selections[r]);
            copied.push(self.selections.push(selection));
        }
        self.selection_sets.push(SelectionSet {
            selection_refs: copied,
        })
    }

    pub fn copy_selection(&mut self, selection: Selection) -> Selection {
        match selection {
            Selection::Field(f) => Selection::Field(self.copy_field(f)),
            Selection::FragmentSpread(s) => Selection::FragmentSpread(self.copy_fragment_spread(s)),
            Selection::InlineFragment(i) => Selection::InlineFragment(self.copy_inline_fragment(i)),
        }
    }

    pub fn copy_field(&mut self, field: Ref<Field>) -> Ref<Field> {
        let Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
        } = self.fields[field].clone();
        let arguments = self.copy_arguments(&arguments);
        let directives = self.copy_directives(&directives);
        let selection_set = selection_set.map(|set| self.copy_selection_set(set));
        self.fields.push(Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
        })
    }

    pub fn copy_fragment_spread(&mut self, spread: Ref<FragmentSpread>) -> Ref<FragmentSpread> {
        let FragmentSpread {
            fragment_name,
            directives,
        } = self.fragment_spreads[spread].clone();
        let directives = self.copy_directives(&directives);
        self.fragment_spreads.push(FragmentSpread {
            fragment_name,
            directives,
        })
    }

    pub fn copy_inline_fragment(&mut self, inline: Ref<InlineFragment>) -> Ref<InlineFragment> {
        let InlineFragment {
            type_condition,
            directives,
            selection_set,
        } = self.inline_fragments[inline].clone();
        let directives = self.copy_directives(&directives);
        let selection_set = selection_set.map(|set| self.copy_selection_set(set));
        self.inline_fragments.push(InlineFragment {
            type_condition,
            directives,
            selection_set,
        })
    }

    pub fn copy_arguments(&mut self, arguments: &[Ref<Argument>]) -> Vec<Ref<Argument>> {
        arguments
            .to_vec()
            .into_iter()
            .map(|a| {
                let Argument { name, value } = self.arguments[a];
                let value = self.copy_value(value);
                self.arguments.push(Argument { name, value })
            })
            .collect()
    }

    pub fn copy_directives(&mut self, directives: &[Ref<Directive>]) -> Vec<Ref<Directive>> {
        directives
            .to_vec()
            .into_iter()
            .map(|d| {
                let Directive { name, arguments } = self.directives[d].clone();
                let arguments = self.copy_arguments(&arguments);
                self.directives.push(Directive { name, arguments })
            })
            .collect()
    }

    pub fn copy_value(&mut self, value: Value) -> Value {
        match value {
            Value::Null | Value::Boolean(_) => value,
            // Scalar arenas are immutable once written, sharing is safe.
            Value::Int(_) | Value::Float(_) | Value::String(_) | Value::Enum(_) => value,
            Value::Variable(r) => {
                let node = self.variable_values[r].clone();
                Value::Variable(self.variable_values.push(node))
            }
            Value::List(r) => {
                let items = self.list_values[r].refs.clone();
                let refs = items.into_iter().map(|v| self.copy_value(v)).collect();
                Value::List(self.list_values.push(super::ListValue { refs }))
            }
            Value::Object(r) => {
                let fields = self.object_values[r].refs.clone();
                let refs = fields
                    .into_iter()
                    .map(|f| {
                        let ObjectField { name, value } = self.object_fields[f];
                        let value = self.copy_value(value);
                        self.object_fields.push(ObjectField { name, value })
                    })
                    .collect();
                Value::Object(self.object_values.push(ObjectValue { refs }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::ByteSpan;
    use super::*;

    #[test]
    fn replace_selection_splices_in_place() {
        let mut doc = Document::new();
        let set = doc.add_selection_set();
        let fields: Vec<Ref<Field>> = (0..3)
            .map(|_| {
                doc.fields.push(Field {
                    alias: None,
                    name: ByteSpan::EMPTY,
                    arguments: Vec::new(),
                    directives: Vec::new(),
                    selection_set: None,
                })
            })
            .collect();
        for &f in &fields {
            doc.add_selection(set, Selection::Field(f));
        }

        let replacement = doc.fields.push(Field {
            alias: None,
            name: ByteSpan::EMPTY,
            arguments: Vec::new(),
            directives: Vec::new(),
            selection_set: None,
        });
        doc.replace_selection_at(
            set,
            1,
            vec![
                Selection::Field(replacement),
                Selection::Field(replacement),
            ],
        );

        let live: Vec<Selection> = doc.selection_sets[set]
            .selection_refs
            .iter()
            .map(|&r| doc.selections[r])
            .collect();
        assert_eq!(
            live,
            vec![
                Selection::Field(fields[0]),
                Selection::Field(replacement),
                Selection::Field(replacement),
                Selection::Field(fields[2]),
            ]
        );
    }

    #[test]
    fn copied_selection_set_does_not_alias_the_original() {
        let mut doc = Document::new();
        let set = doc.add_selection_set();
        let name = doc.input.append("hero");
        let field = doc.fields.push(Field {
            alias: None,
            name,
            arguments: Vec::new(),
            directives: Vec::new(),
            selection_set: None,
        });
        doc.add_selection(set, Selection::Field(field));

        let copy = doc.copy_selection_set(set);
        doc.remove_selection_at(copy, 0);

        assert_eq!(doc.selection_sets[set].selection_refs.len(), 1);
        assert!(doc.selection_set_is_empty(copy));
    }
}
