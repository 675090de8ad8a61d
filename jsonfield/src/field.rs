//! Field tree: leaf inputs and path-bound groups over a structured attribute.
//!
//! A tree is built in two phases. Construction only records labels, attributes
//! and children. [`PathFieldGroup::assign_paths`] (or [`PathFieldGroup::bound`])
//! then stamps every node with its working path, e.g. `address->location->latitude`,
//! which keys both resolve lookups and submitted form values.
//!
//! ```
//! use jsonfield::{LeafField, PathFieldGroup};
//!
//! let group = PathFieldGroup::new("Address")
//!     .field(LeafField::new("Street"))
//!     .field(PathFieldGroup::new("Location").field(LeafField::new("Latitude")))
//!     .bound();
//!
//! let paths: Vec<String> = group
//!     .leaves()
//!     .iter()
//!     .filter_map(|leaf| leaf.working_path().map(ToString::to_string))
//!     .collect();
//! assert_eq!(paths, ["address->street", "address->location->latitude"]);
//! ```

use std::collections::BTreeMap;

use log::{debug, trace};
use serde_json::Value;

use crate::errors::{FieldError, FieldResult, ValidationError, ValidationResult};
use crate::host::{FormRequest, HostEntity};
use crate::path::AttributePath;
use crate::rules::{ValidationRule, validate_rule_on_input};
use crate::slug::attribute_slug;
use crate::tree;

/// A node of the field tree.
#[derive(Debug, Clone)]
pub enum Field {
    Leaf(LeafField),
    Group(PathFieldGroup),
}

impl Field {
    pub fn label(&self) -> &str {
        match self {
            Field::Leaf(leaf) => leaf.label(),
            Field::Group(group) => group.label(),
        }
    }

    pub fn attribute(&self) -> &str {
        match self {
            Field::Leaf(leaf) => leaf.attribute(),
            Field::Group(group) => group.attribute(),
        }
    }

    pub fn working_path(&self) -> Option<&AttributePath> {
        match self {
            Field::Leaf(leaf) => leaf.working_path(),
            Field::Group(group) => group.working_path(),
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafField> {
        match self {
            Field::Leaf(leaf) => Some(leaf),
            Field::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&PathFieldGroup> {
        match self {
            Field::Group(group) => Some(group),
            Field::Leaf(_) => None,
        }
    }

    /// Reads the value(s) at `path` from `source` into this node.
    pub fn resolve<S>(&mut self, source: &S, path: &AttributePath)
    where
        S: HostEntity + ?Sized,
    {
        match self {
            Field::Leaf(leaf) => leaf.resolve(source, path),
            Field::Group(group) => group.resolve(source, path),
        }
    }

    /// Writes the submitted value at `path` into `target`.
    pub fn fill_into<R, H>(&self, request: &R, target: &mut H, path: &AttributePath) -> FieldResult<()>
    where
        R: FormRequest + ?Sized,
        H: HostEntity + ?Sized,
    {
        match self {
            Field::Leaf(leaf) => leaf.fill_into(request, target, path),
            Field::Group(group) => group.fill_into(request, target, path),
        }
    }

    fn assign_paths(&mut self, base: Option<&AttributePath>) {
        match self {
            Field::Leaf(leaf) => leaf.assign_path(base),
            Field::Group(group) => group.assign_paths(base),
        }
    }

    /// Leaves match a path exactly; groups match every path below them.
    fn owns(&self, path: &AttributePath) -> bool {
        match self {
            Field::Leaf(leaf) => leaf.working_path() == Some(path),
            Field::Group(group) => group.working_path().is_some_and(|own| own.is_prefix_of(path)),
        }
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafField>) {
        match self {
            Field::Leaf(leaf) => out.push(leaf),
            Field::Group(group) => {
                for child in &group.children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

impl From<LeafField> for Field {
    fn from(leaf: LeafField) -> Self {
        Field::Leaf(leaf)
    }
}

impl From<PathFieldGroup> for Field {
    fn from(group: PathFieldGroup) -> Self {
        Field::Group(group)
    }
}

/// Top-level attribute of `path`, provided `target` declares it with a structured cast.
fn ensure_structured<'p, H>(target: &H, path: &'p AttributePath) -> FieldResult<&'p str>
where
    H: HostEntity + ?Sized,
{
    let attribute = path.top_level();
    if target.has_structured_cast(attribute) {
        Ok(attribute)
    } else {
        Err(FieldError::AttributeCast {
            attribute: attribute.to_string(),
        })
    }
}

/// A single input bound to one scalar value inside a structured attribute.
#[derive(Debug, Clone)]
pub struct LeafField {
    label: String,
    attribute: String,
    working_path: Option<AttributePath>,
    rules: Vec<ValidationRule>,
    nullable: bool,
    value: Option<Value>,
}

impl LeafField {
    /// Leaf whose attribute is derived from the label.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let attribute = attribute_slug(&label);
        Self::with_attribute(label, attribute)
    }

    pub fn with_attribute(label: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            attribute: attribute.into(),
            working_path: None,
            rules: Vec::new(),
            nullable: false,
            value: None,
        }
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = ValidationRule>,
    {
        self.rules.extend(rules);
        self
    }

    /// Store empty submissions as `null` instead of an empty string.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn working_path(&self) -> Option<&AttributePath> {
        self.working_path.as_ref()
    }

    pub fn validation_rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Display value from the last resolve; `None` when the path was absent.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    fn assign_path(&mut self, base: Option<&AttributePath>) {
        self.working_path = if self.attribute.is_empty() {
            None
        } else {
            Some(match base {
                Some(base) => base.child(&self.attribute),
                None => AttributePath::root(self.attribute.clone()),
            })
        };
    }

    /// Reads the value at `path` from `source`. Missing keys resolve to `None`.
    pub fn resolve<S>(&mut self, source: &S, path: &AttributePath)
    where
        S: HostEntity + ?Sized,
    {
        let value = source
            .attribute(path.top_level())
            .and_then(|root| tree::read_nested(&root, path.nested()).cloned());
        trace!("resolved {path} -> {value:?}");
        self.value = value;
    }

    /// Writes the value submitted under `path` into the structured attribute on `target`.
    ///
    /// The top-level attribute must carry a structured cast; otherwise this fails
    /// with [`FieldError::AttributeCast`] before touching `target`. Missing
    /// intermediate maps are created. A key absent from the request leaves the
    /// attribute as it is.
    pub fn fill_into<R, H>(&self, request: &R, target: &mut H, path: &AttributePath) -> FieldResult<()>
    where
        R: FormRequest + ?Sized,
        H: HostEntity + ?Sized,
    {
        let attribute = ensure_structured(target, path)?;

        let key = path.to_string();
        let Some(raw) = request.input(&key) else {
            debug!("skipping {key}: no submitted value");
            return Ok(());
        };
        let submitted = if self.nullable && raw.is_empty() {
            Value::Null
        } else {
            Value::String(raw.to_string())
        };

        let mut root = target.attribute(attribute).unwrap_or(Value::Null);
        tree::write_nested(&mut root, path, submitted)?;
        target.set_attribute(attribute, root)?;
        debug!("filled {key}");
        Ok(())
    }

    /// [`fill_into`](Self::fill_into) at this leaf's own working path.
    pub fn fill<R, H>(&self, request: &R, target: &mut H) -> FieldResult<()>
    where
        R: FormRequest + ?Sized,
        H: HostEntity + ?Sized,
    {
        let path = self.working_path.as_ref().ok_or_else(|| {
            FieldError::invalid_path(
                self.attribute.clone(),
                "field has no working path; bind its group with assign_paths first",
            )
        })?;
        self.fill_into(request, target, path)
    }
}

/// A named group of fields bound under one base attribute path.
#[derive(Debug, Clone)]
pub struct PathFieldGroup {
    label: String,
    attribute: String,
    children: Vec<Field>,
    working_path: Option<AttributePath>,
}

impl PathFieldGroup {
    /// Empty group whose attribute is derived from the label.
    pub fn new(label: impl Into<String>) -> Self {
        Self::make(label, Vec::new())
    }

    /// Group with children; the attribute is derived from the label.
    pub fn make(label: impl Into<String>, children: Vec<Field>) -> Self {
        let label = label.into();
        let attribute = attribute_slug(&label);
        Self::with_attribute(label, attribute, children)
    }

    /// Group with an explicit attribute.
    pub fn with_attribute(label: impl Into<String>, attribute: impl Into<String>, children: Vec<Field>) -> Self {
        Self {
            label: label.into(),
            attribute: attribute.into(),
            children,
            working_path: None,
        }
    }

    /// Appends a child (builder form).
    pub fn field(mut self, child: impl Into<Field>) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: impl Into<Field>) {
        self.children.push(child.into());
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn children(&self) -> &[Field] {
        &self.children
    }

    pub fn working_path(&self) -> Option<&AttributePath> {
        self.working_path.as_ref()
    }

    /// Whether this is the anonymous wrapper used only to prefix its children.
    pub fn is_anonymous(&self) -> bool {
        self.attribute.is_empty()
    }

    /// Stamps working paths on this group and every descendant.
    ///
    /// The group's path is `base->attribute`, just `attribute` without a base,
    /// or `base` itself for the anonymous wrapper. Children are stamped below it.
    pub fn assign_paths(&mut self, base: Option<&AttributePath>) {
        self.working_path = match base {
            Some(base) => Some(base.child(&self.attribute)),
            None if self.attribute.is_empty() => None,
            None => Some(AttributePath::root(self.attribute.clone())),
        };
        let own = self.working_path.clone();
        for child in &mut self.children {
            child.assign_paths(own.as_ref());
        }
    }

    /// Consumes the group and returns it with working paths assigned from the root.
    pub fn bound(mut self) -> Self {
        self.assign_paths(None);
        self
    }

    /// Every leaf in display order, nested groups flattened.
    pub fn leaves(&self) -> Vec<&LeafField> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_leaves(&mut out);
        }
        out
    }

    /// The leaf bound to exactly `path`.
    pub fn leaf(&self, path: &AttributePath) -> Option<&LeafField> {
        self.leaves().into_iter().find(|leaf| leaf.working_path() == Some(path))
    }

    /// Resolves the children under `path`.
    ///
    /// Children whose working path lies below `path` resolve at their own path;
    /// when `path` points deeper than this group, the owning child resolves it.
    /// The group itself holds no display value.
    pub fn resolve<S>(&mut self, source: &S, path: &AttributePath)
    where
        S: HostEntity + ?Sized,
    {
        for child in &mut self.children {
            let Some(child_path) = child.working_path().cloned() else {
                continue;
            };
            if path.is_prefix_of(&child_path) {
                child.resolve(source, &child_path);
            } else if child_path.is_prefix_of(path) {
                child.resolve(source, path);
            }
        }
    }

    /// Resolves every child at its working path.
    pub fn resolve_all<S>(&mut self, source: &S)
    where
        S: HostEntity + ?Sized,
    {
        for child in &mut self.children {
            if let Some(child_path) = child.working_path().cloned() {
                child.resolve(source, &child_path);
            }
        }
    }

    /// Delegates the fill of `path` to the child that owns it.
    ///
    /// The structured-cast check runs first, so a misdeclared attribute fails
    /// even for a path no child owns. Such a path is otherwise ignored.
    pub fn fill_into<R, H>(&self, request: &R, target: &mut H, path: &AttributePath) -> FieldResult<()>
    where
        R: FormRequest + ?Sized,
        H: HostEntity + ?Sized,
    {
        ensure_structured(target, path)?;

        match self.children.iter().find(|child| child.owns(path)) {
            Some(child) => child.fill_into(request, target, path),
            None => {
                debug!("group `{}` has no field bound to {path}", self.label);
                Ok(())
            }
        }
    }

    /// Fills every leaf whose working path was submitted, in display order.
    ///
    /// Each leaf is written independently; the first error stops the pass and
    /// leaves earlier writes in place. Returns the number of leaves written.
    pub fn fill_all<R, H>(&self, request: &R, target: &mut H) -> FieldResult<usize>
    where
        R: FormRequest + ?Sized,
        H: HostEntity + ?Sized,
    {
        let mut filled = 0;
        for leaf in self.leaves() {
            let Some(path) = leaf.working_path() else {
                continue;
            };
            if request.has(&path.to_string()) {
                leaf.fill_into(request, target, path)?;
                filled += 1;
            }
        }
        Ok(filled)
    }

    /// Validation rules of every leaf keyed by its working path.
    pub fn rules(&self) -> BTreeMap<String, Vec<ValidationRule>> {
        self.leaves()
            .into_iter()
            .filter(|leaf| !leaf.rules.is_empty())
            .filter_map(|leaf| {
                leaf.working_path()
                    .map(|path| (path.to_string(), leaf.rules.clone()))
            })
            .collect()
    }

    /// Checks the submitted values of every leaf against its rules.
    pub fn validate<R>(&self, request: &R) -> ValidationResult<()>
    where
        R: FormRequest + ?Sized,
    {
        let mut issues = Vec::new();
        for leaf in self.leaves() {
            let Some(path) = leaf.working_path() else {
                continue;
            };
            let key = path.to_string();
            let input = request.input(&key);
            for rule in &leaf.rules {
                validate_rule_on_input(&key, rule, input, &mut issues);
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{CastKind, Record, SubmittedForm};
    use serde_json::json;

    fn path(raw: &str) -> AttributePath {
        AttributePath::parse(raw).unwrap()
    }

    fn address_group() -> PathFieldGroup {
        PathFieldGroup::with_attribute(
            "Address",
            "address",
            vec![
                LeafField::new("Street").into(),
                PathFieldGroup::make(
                    "Location",
                    vec![LeafField::new("Latitude").into(), LeafField::new("Longitude").into()],
                )
                .into(),
            ],
        )
        .bound()
    }

    #[test]
    fn assigns_paths_recursively() {
        let group = address_group();
        assert_eq!(group.working_path(), Some(&path("address")));
        let location = group.children()[1].as_group().unwrap();
        assert_eq!(location.working_path(), Some(&path("address->location")));
        let paths: Vec<String> = group
            .leaves()
            .iter()
            .map(|leaf| leaf.working_path().unwrap().to_string())
            .collect();
        assert_eq!(paths, ["address->street", "address->location->latitude", "address->location->longitude"]);
    }

    #[test]
    fn anonymous_wrapper_does_not_prefix() {
        let group = PathFieldGroup::make("", vec![LeafField::new("Street").into()]).bound();
        assert!(group.is_anonymous());
        assert_eq!(group.working_path(), None);
        assert_eq!(group.leaves()[0].working_path(), Some(&path("street")));
    }

    #[test]
    fn unbound_leaf_cannot_fill_by_itself() {
        let leaf = LeafField::new("Street");
        let mut record = Record::new().with_cast("street", CastKind::Array);
        let err = leaf.fill(&SubmittedForm::new(), &mut record).unwrap_err();
        assert!(matches!(err, FieldError::InvalidPath { .. }));
    }

    #[test]
    fn group_resolve_reaches_nested_leaves() {
        let mut group = address_group();
        let record = Record::new()
            .with_cast("address", CastKind::Array)
            .with_attribute("address", json!({"street": "main", "location": {"latitude": "1.5"}}));
        group.resolve(&record, &path("address"));
        let leaves = group.leaves();
        assert_eq!(leaves[0].value(), Some(&json!("main")));
        assert_eq!(leaves[1].value(), Some(&json!("1.5")));
        assert_eq!(leaves[2].value(), None);
    }

    #[test]
    fn group_resolve_delegates_deeper_path() {
        let mut group = address_group();
        let record = Record::new().with_attribute("address", json!({"street": "main", "location": {"latitude": "1.5"}}));
        group.resolve(&record, &path("address->location->latitude"));
        let leaves = group.leaves();
        assert_eq!(leaves[0].value(), None);
        assert_eq!(leaves[1].value(), Some(&json!("1.5")));
    }

    #[test]
    fn nullable_leaf_stores_null_for_empty_input() {
        let group = PathFieldGroup::make("Address", vec![LeafField::new("Zip").nullable().into()]).bound();
        let mut record = Record::new().with_cast("address", CastKind::Json);
        let form = SubmittedForm::new().with("address->zip", "");
        group.fill_into(&form, &mut record, &path("address->zip")).unwrap();
        assert_eq!(record.get("address"), Some(&json!({"zip": null})));
    }

    #[test]
    fn missing_submission_leaves_attribute_alone() {
        let group = address_group();
        let mut record = Record::new()
            .with_cast("address", CastKind::Array)
            .with_attribute("address", json!({"street": "main"}));
        group
            .fill_into(&SubmittedForm::new(), &mut record, &path("address->street"))
            .unwrap();
        assert_eq!(record.get("address"), Some(&json!({"street": "main"})));
    }

    #[test]
    fn unowned_path_is_ignored() {
        let group = address_group();
        let mut record = Record::new().with_cast("address", CastKind::Array);
        let form = SubmittedForm::new().with("address->country", "NL");
        group.fill_into(&form, &mut record, &path("address->country")).unwrap();
        assert_eq!(record.get("address"), None);
    }

    #[test]
    fn scalar_top_level_value_is_replaced_by_a_map() {
        let group = address_group();
        let mut record = Record::new()
            .with_cast("address", CastKind::Array)
            .with_attribute("address", json!("not a map"));
        let form = SubmittedForm::new().with("address->street", "main");
        group.fill_into(&form, &mut record, &path("address->street")).unwrap();
        assert_eq!(record.get("address"), Some(&json!({"street": "main"})));
    }

    #[test]
    fn unowned_path_still_requires_structured_cast() {
        let group = address_group();
        let mut record = Record::new().with_cast("address", CastKind::String);
        let form = SubmittedForm::new().with("address->country", "NL");
        let err = group.fill_into(&form, &mut record, &path("address->country")).unwrap_err();
        assert!(matches!(err, FieldError::AttributeCast { ref attribute } if attribute == "address"));
    }
}
