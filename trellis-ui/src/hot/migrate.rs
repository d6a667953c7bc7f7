use super::record::{Behavior, Record, Value};
use super::registry::{BehaviorResolver, ResolveError};
use smallvec::{smallvec, SmallVec};
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// What a migration pass did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Distinct records reached
    pub visited: usize,
    /// Records whose behavior was swapped
    pub rebound: usize,
    /// Class names the resolver could not provide, once each
    pub unresolved: Vec<String>,
}

/// Rebind every record reachable from `root` to the latest behavior
/// registered under its class name, leaving its fields untouched.
///
/// Lookup failures (unknown class, resolver error or panic) keep the
/// record's current behavior and never abort the walk.
pub fn migrate(root: &Value, resolver: &dyn BehaviorResolver) -> MigrationReport {
    Migration::new(resolver).run(root)
}

struct Migration<'r> {
    resolver: &'r dyn BehaviorResolver,
    visited: HashSet<*const Record>,
    classes: HashMap<String, Option<Rc<Behavior>>>,
    report: MigrationReport,
}

impl<'r> Migration<'r> {
    fn new(resolver: &'r dyn BehaviorResolver) -> Self {
        Self {
            resolver,
            visited: HashSet::new(),
            classes: HashMap::new(),
            report: MigrationReport::default(),
        }
    }

    fn run(mut self, root: &Value) -> MigrationReport {
        // Depth-first, fields in declaration order
        let mut stack: SmallVec<[Value; 16]> = smallvec![root.clone()];
        while let Some(value) = stack.pop() {
            match value {
                Value::Record(record) => {
                    if !self.visited.insert(Rc::as_ptr(&record)) {
                        continue;
                    }
                    self.report.visited += 1;
                    self.rebind(&record);
                    stack.extend(record.field_values().into_iter().rev());
                }
                Value::List(items) => stack.extend(items.into_iter().rev()),
                Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) => {}
            }
        }

        tracing::debug!(
            visited = self.report.visited,
            rebound = self.report.rebound,
            unresolved = self.report.unresolved.len(),
            "migration finished"
        );
        self.report
    }

    fn rebind(&mut self, record: &Record) {
        let current = record.behavior();
        let class_name = current.class_name();

        let latest = match self.classes.get(class_name) {
            Some(cached) => cached.clone(),
            None => {
                let resolved = self.lookup(class_name);
                self.classes.insert(class_name.to_string(), resolved.clone());
                resolved
            }
        };

        let Some(latest) = latest else {
            return;
        };
        if Rc::ptr_eq(&latest, &current) {
            return;
        }
        record.rebind(latest);
        self.report.rebound += 1;
    }

    fn lookup(&mut self, class_name: &str) -> Option<Rc<Behavior>> {
        let resolver = self.resolver;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| resolver.resolve(class_name)))
            .unwrap_or_else(|_| Err(ResolveError::Panicked(class_name.to_string())));

        match outcome {
            Ok(Some(behavior)) => Some(behavior),
            Ok(None) => {
                tracing::debug!(class = class_name, "no behavior registered, keeping current");
                self.report.unresolved.push(class_name.to_string());
                None
            }
            Err(error) => {
                tracing::warn!(
                    class = class_name,
                    %error,
                    "behavior lookup failed, keeping current"
                );
                self.report.unresolved.push(class_name.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hot::BehaviorRegistry;
    use std::cell::Cell;

    fn behavior(name: &str) -> Rc<Behavior> {
        Rc::new(Behavior::new(name))
    }

    #[test]
    fn test_rebinds_nested_records_and_keeps_fields() {
        let child = Record::with_fields(behavior("Item"), [("title", Value::from("milk"))]);
        let parent = Record::with_fields(
            behavior("List"),
            [("items", Value::List(vec![Value::from(child.clone()), Value::Int(3)]))],
        );

        let mut registry = BehaviorRegistry::new();
        let item = registry.register(Behavior::new("Item"));
        let list = registry.register(Behavior::new("List"));

        let report = migrate(&Value::from(parent.clone()), &registry);

        assert_eq!(report.visited, 2);
        assert_eq!(report.rebound, 2);
        assert!(Rc::ptr_eq(&parent.behavior(), &list));
        assert!(Rc::ptr_eq(&child.behavior(), &item));
        assert_eq!(child.get("title"), Some(Value::from("milk")));
    }

    #[test]
    fn test_same_behavior_is_not_rebound() {
        let mut registry = BehaviorRegistry::new();
        let current = registry.register(Behavior::new("Item"));
        let record = Record::new(current.clone());

        let report = migrate(&Value::from(record.clone()), &registry);
        assert_eq!(report.visited, 1);
        assert_eq!(report.rebound, 0);
        assert!(Rc::ptr_eq(&record.behavior(), &current));
    }

    #[test]
    fn test_self_reference_terminates() {
        let record = Record::new(behavior("Node"));
        record.set("me", record.clone());
        record.set("again", Value::List(vec![Value::from(record.clone())]));

        let registry = BehaviorRegistry::new();
        let report = migrate(&Value::from(record.clone()), &registry);
        assert_eq!(report.visited, 1);
        assert_eq!(report.unresolved, vec!["Node".to_string()]);

        record.remove("me");
        record.remove("again");
    }

    #[test]
    fn test_resolver_called_once_per_class() {
        let calls = Cell::new(0);
        let latest = behavior("Item");
        let resolver = |_: &str| -> crate::hot::ResolveResult<Option<Rc<Behavior>>> {
            calls.set(calls.get() + 1);
            Ok(Some(latest.clone()))
        };

        let items: Vec<Value> = (0..5)
            .map(|_| Value::from(Record::new(behavior("Item"))))
            .collect();
        let report = migrate(&Value::List(items), &resolver);

        assert_eq!(report.visited, 5);
        assert_eq!(report.rebound, 5);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_panicking_resolver_is_contained() {
        let original = behavior("Broken");
        let record = Record::new(original.clone());
        let resolver = |_: &str| -> crate::hot::ResolveResult<Option<Rc<Behavior>>> {
            panic!("resolver exploded")
        };

        let report = migrate(&Value::from(record.clone()), &resolver);
        assert_eq!(report.visited, 1);
        assert_eq!(report.rebound, 0);
        assert!(Rc::ptr_eq(&record.behavior(), &original));
    }

    #[test]
    fn test_scalars_terminate_without_error() {
        let registry = BehaviorRegistry::new();
        let report = migrate(
            &Value::List(vec![Value::Int(1), Value::from("x"), Value::Null]),
            &registry,
        );
        assert_eq!(report, MigrationReport::default());
    }
}
