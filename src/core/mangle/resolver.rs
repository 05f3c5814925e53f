//! Scope-stack walk over class bodies that turns private names into edits.

use std::collections::HashMap;

use swc_ecma_ast::{BinExpr, BinaryOp, Class, ClassMember, Expr, Key, PrivateName};
use swc_ecma_visit::{Visit, VisitWith};

use super::names::NameGenerator;
use crate::core::edit::Edit;
use crate::core::parsers::source::ParsedSource;

/// Private name (without `#`) → generated name, for one class body.
type PrivateScope = HashMap<String, String>;

/// Collects one [`Edit`] per private-name occurrence that resolves to a declaring class.
pub struct PrivateNameResolver<'a> {
    parsed: &'a ParsedSource,
    names: &'a mut NameGenerator,
    /// Innermost class last.
    scopes: Vec<PrivateScope>,
    edits: Vec<Edit>,
    /// Classes that declare at least one private member.
    class_count: usize,
}

impl<'a> PrivateNameResolver<'a> {
    pub fn new(parsed: &'a ParsedSource, names: &'a mut NameGenerator) -> Self {
        Self {
            parsed,
            names,
            scopes: Vec::new(),
            edits: Vec::new(),
            class_count: 0,
        }
    }

    /// Walk the whole program and return the discovered edits, unsorted.
    pub fn resolve(mut self) -> (Vec<Edit>, usize) {
        let parsed = self.parsed;
        parsed.program.visit_with(&mut self);
        (self.edits, self.class_count)
    }

    /// Declared private members of `class`, in declaration order, each name allocated once.
    /// A getter/setter pair shares a single generated name.
    fn declare_members(&mut self, class: &Class) -> PrivateScope {
        let mut scope = PrivateScope::new();
        for member in &class.body {
            if let Some(key) = private_key(member) {
                let name = key.name.to_string();
                if !scope.contains_key(&name) {
                    let short = self.names.next_name();
                    scope.insert(name, short);
                }
            }
        }
        scope
    }

    /// Innermost-first lookup.
    fn lookup(&self, name: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .map(String::as_str)
    }

    /// `[start, end)` of the `#name` token.
    fn private_range(&self, node: &PrivateName) -> (usize, usize) {
        let (start, end) = self.parsed.range(node.span);
        let bytes = self.parsed.code().as_bytes();
        // Some parser versions start the span after the `#`.
        if start > 0 && bytes.get(start) != Some(&b'#') && bytes.get(start - 1) == Some(&b'#') {
            return (start - 1, end);
        }
        (start, end)
    }

    fn rename(&mut self, node: &PrivateName, quoted: bool) {
        let Some(short) = self.lookup(&node.name) else {
            return;
        };
        let replacement = if quoted {
            format!("'{}'", short)
        } else {
            short.to_string()
        };
        let (start, end) = self.private_range(node);
        self.edits.push(Edit::new(start, end, replacement));
    }
}

fn private_key(member: &ClassMember) -> Option<&PrivateName> {
    match member {
        ClassMember::PrivateProp(prop) => Some(&prop.key),
        ClassMember::PrivateMethod(method) => Some(&method.key),
        ClassMember::AutoAccessor(accessor) => match &accessor.key {
            Key::Private(name) => Some(name),
            Key::Public(_) => None,
        },
        _ => None,
    }
}

impl Visit for PrivateNameResolver<'_> {
    fn visit_class(&mut self, class: &Class) {
        // Decorators and the heritage clause see the enclosing private environment.
        class.decorators.visit_with(self);
        if let Some(super_class) = &class.super_class {
            super_class.visit_with(self);
        }

        let scope = self.declare_members(class);
        if !scope.is_empty() {
            self.class_count += 1;
        }

        self.scopes.push(scope);
        class.body.visit_with(self);
        self.scopes.pop();
    }

    fn visit_bin_expr(&mut self, node: &BinExpr) {
        if node.op == BinaryOp::In
            && let Expr::PrivateName(name) = &*node.left
        {
            // `#x in obj` needs a string operand once `#x` is an ordinary property.
            self.rename(name, true);
            node.right.visit_with(self);
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_private_name(&mut self, node: &PrivateName) {
        self.rename(node, false);
    }
}
