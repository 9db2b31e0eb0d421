use std::iter;

use fnv::{FnvHashMap, FnvHashSet};
use itertools::Itertools as _;

use crate::{
    ast::{Document, Fragment, FragmentSpread},
    parser::{SourcePosition, Spanning},
    validation::{RuleError, ValidatorContext, Visitor},
};

pub struct NoFragmentCycles<'a> {
    current_fragment: Option<&'a str>,
    spreads: FnvHashMap<&'a str, Vec<&'a Spanning<FragmentSpread>>>,
    fragment_order: Vec<&'a str>,
}

struct CycleDetector<'r, 'a> {
    initial: &'a str,
    spreads: &'r FnvHashMap<&'a str, Vec<&'a Spanning<FragmentSpread>>>,
    known_to_lead_to_cycle: &'r mut FnvHashSet<SourcePosition>,
    path: Vec<&'a Spanning<FragmentSpread>>,
    errors: Vec<RuleError>,
}

pub fn factory<'a>() -> NoFragmentCycles<'a> {
    NoFragmentCycles {
        current_fragment: None,
        spreads: FnvHashMap::default(),
        fragment_order: Vec::new(),
    }
}

impl<'a> Visitor<'a> for NoFragmentCycles<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document) {
        let mut known_to_lead_to_cycle = FnvHashSet::default();

        for &initial in &self.fragment_order {
            let mut detector = CycleDetector {
                initial,
                spreads: &self.spreads,
                known_to_lead_to_cycle: &mut known_to_lead_to_cycle,
                path: Vec::new(),
                errors: Vec::new(),
            };
            detector.detect_from(initial);

            for error in detector.errors {
                ctx.report_error(error.message(), error.locations());
            }
        }
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment>,
    ) {
        let name = fragment.item.name.item.as_str();
        self.fragment_order.push(name);
        self.current_fragment = Some(name);
    }

    fn exit_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Fragment>,
    ) {
        self.current_fragment = None;
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread>,
    ) {
        if let Some(current_fragment) = self.current_fragment {
            self.spreads.entry(current_fragment).or_default().push(spread);
        }
    }
}

impl<'a> CycleDetector<'_, 'a> {
    fn detect_from(&mut self, from: &'a str) {
        let all_spreads = self.spreads;
        let Some(spreads) = all_spreads.get(from) else {
            return;
        };

        for &spread in spreads {
            if self.known_to_lead_to_cycle.contains(&spread.start()) {
                continue;
            }

            let name = spread.item.name.item.as_str();
            if name == self.initial {
                let via = self
                    .path
                    .iter()
                    .map(|s| s.item.name.item.as_str())
                    .collect::<Vec<_>>();
                let locations = self
                    .path
                    .iter()
                    .chain(iter::once(&spread))
                    .map(|s| s.start())
                    .collect::<Vec<_>>();

                self.known_to_lead_to_cycle.extend(locations.iter().copied());
                self.errors
                    .push(RuleError::new(&error_message(name, &via), &locations));
                continue;
            }

            if self.path.iter().any(|s| s.start() == spread.start()) {
                continue;
            }

            self.path.push(spread);
            self.detect_from(name);
            self.path.pop();
        }
    }
}

fn error_message(frag_name: &str, via: &[&str]) -> String {
    if via.is_empty() {
        format!("Cannot spread fragment \"{frag_name}\" within itself.")
    } else {
        format!(
            "Cannot spread fragment \"{frag_name}\" within itself via {}.",
            via.iter().join(", "),
        )
    }
}
