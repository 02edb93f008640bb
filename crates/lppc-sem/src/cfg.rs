//! Control-flow graph construction.
//!
//! One CFG per function. Straight-line statements are linearized;
//! branches fork into then/else successors that meet at a Merge node;
//! loops get a LoopHead with a back edge from the body tail (LoopBack)
//! plus an exit edge. Every function has a dedicated Entry and Exit.
//!
//! `return` (and `break`/`continue`) sever the fall-through edge:
//! statements after them acquire no predecessor and show up as
//! unreachable in the reachability pass.
//!
//! Nodes reference statements and conditions by borrow; the graph lives
//! only for the duration of one analyzer call.

use indexmap::IndexMap;
use lppc_par::ast::{Expr, Stmt};

use crate::symbolic::SymbolicValue;

/// Kinds of CFG nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfgNodeKind {
    Entry,
    Exit,
    Statement,
    Branch,
    Merge,
    LoopHead,
    LoopBack,
}

/// One node in the control-flow graph.
#[derive(Debug)]
pub struct CfgNode<'a> {
    pub id: usize,
    pub kind: CfgNodeKind,
    /// The statement this node stands for (Statement nodes).
    pub stmt: Option<&'a Stmt>,
    /// The branch or loop condition (Branch / LoopHead nodes).
    pub condition: Option<&'a Expr>,
    pub preds: Vec<usize>,
    pub succs: Vec<usize>,
    /// Dataflow state flowing into the node.
    pub state_in: IndexMap<String, SymbolicValue>,
    /// Dataflow state flowing out of the node.
    pub state_out: IndexMap<String, SymbolicValue>,
}

/// A function's control-flow graph.
#[derive(Debug)]
pub struct Cfg<'a> {
    pub nodes: Vec<CfgNode<'a>>,
    pub entry: usize,
    pub exit: usize,
}

impl<'a> Cfg<'a> {
    /// Build the CFG for a function body.
    pub fn build(body: &'a [Stmt]) -> Self {
        let mut builder = CfgBuilder {
            nodes: Vec::new(),
        };
        let entry = builder.node(CfgNodeKind::Entry);
        let exit = builder.node(CfgNodeKind::Exit);

        let tail = builder.lower_stmts(body, Some(entry));
        if let Some(tail) = tail {
            builder.connect(tail, exit);
        }

        Cfg {
            nodes: builder.nodes,
            entry,
            exit,
        }
    }

    /// Node ids reachable from entry, via depth-first search.
    pub fn reachable(&self) -> Vec<bool> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.entry];
        while let Some(id) = stack.pop() {
            if seen[id] {
                continue;
            }
            seen[id] = true;
            for &succ in &self.nodes[id].succs {
                if !seen[succ] {
                    stack.push(succ);
                }
            }
        }
        seen
    }
}

struct CfgBuilder<'a> {
    nodes: Vec<CfgNode<'a>>,
}

impl<'a> CfgBuilder<'a> {
    fn node(&mut self, kind: CfgNodeKind) -> usize {
        let id = self.nodes.len();
        self.nodes.push(CfgNode {
            id,
            kind,
            stmt: None,
            condition: None,
            preds: Vec::new(),
            succs: Vec::new(),
            state_in: IndexMap::new(),
            state_out: IndexMap::new(),
        });
        id
    }

    fn connect(&mut self, from: usize, to: usize) {
        self.nodes[from].succs.push(to);
        self.nodes[to].preds.push(from);
    }

    fn connect_opt(&mut self, from: Option<usize>, to: usize) {
        if let Some(from) = from {
            self.connect(from, to);
        }
    }

    /// Lower a statement list starting from `current`; returns the new
    /// fall-through node, or `None` when control cannot fall through.
    fn lower_stmts(&mut self, stmts: &'a [Stmt], mut current: Option<usize>) -> Option<usize> {
        for stmt in stmts {
            current = self.lower_stmt(stmt, current);
        }
        current
    }

    fn lower_stmt(&mut self, stmt: &'a Stmt, current: Option<usize>) -> Option<usize> {
        match stmt {
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch = self.node(CfgNodeKind::Branch);
                self.nodes[branch].stmt = Some(stmt);
                self.nodes[branch].condition = Some(condition);
                self.connect_opt(current, branch);

                let merge = self.node(CfgNodeKind::Merge);

                let then_tail = self.lower_stmts(then_branch, Some(branch));
                self.connect_opt(then_tail, merge);

                if else_branch.is_empty() {
                    // Fall-through edge for the false case.
                    self.connect(branch, merge);
                } else {
                    let else_tail = self.lower_stmts(else_branch, Some(branch));
                    self.connect_opt(else_tail, merge);
                }

                Some(merge)
            }

            Stmt::While { condition, body } => {
                let head = self.node(CfgNodeKind::LoopHead);
                self.nodes[head].stmt = Some(stmt);
                self.nodes[head].condition = Some(condition);
                self.connect_opt(current, head);

                let body_tail = self.lower_stmts(body, Some(head));
                let back = self.node(CfgNodeKind::LoopBack);
                self.connect_opt(body_tail, back);
                self.connect(back, head);

                // The loop head doubles as the exit point.
                Some(head)
            }

            Stmt::DoWhile { body, condition } => {
                // Body runs at least once; the head tests afterwards.
                let body_start = self.nodes.len();
                let body_tail = self.lower_stmts(body, current);

                let head = self.node(CfgNodeKind::LoopHead);
                self.nodes[head].condition = Some(condition);
                self.connect_opt(body_tail, head);

                let back = self.node(CfgNodeKind::LoopBack);
                self.connect(head, back);
                if body_start < head {
                    self.connect(back, body_start);
                }

                Some(head)
            }

            Stmt::For {
                initializer,
                condition,
                body,
                ..
            } => {
                let mut cur = current;
                if let Some(init) = initializer {
                    cur = self.lower_stmt(init, cur);
                }

                let head = self.node(CfgNodeKind::LoopHead);
                self.nodes[head].stmt = Some(stmt);
                if let Some(cond) = condition {
                    self.nodes[head].condition = Some(cond);
                }
                self.connect_opt(cur, head);

                let body_tail = self.lower_stmts(body, Some(head));
                let back = self.node(CfgNodeKind::LoopBack);
                self.connect_opt(body_tail, back);
                self.connect(back, head);

                Some(head)
            }

            Stmt::ForIn { body, .. } => {
                let head = self.node(CfgNodeKind::LoopHead);
                self.nodes[head].stmt = Some(stmt);
                self.connect_opt(current, head);

                let body_tail = self.lower_stmts(body, Some(head));
                let back = self.node(CfgNodeKind::LoopBack);
                self.connect_opt(body_tail, back);
                self.connect(back, head);

                Some(head)
            }

            Stmt::Return(_) => {
                let node = self.node(CfgNodeKind::Statement);
                self.nodes[node].stmt = Some(stmt);
                self.connect_opt(current, node);
                // Control flows straight to Exit (always node 1) and
                // does not fall through.
                self.connect(node, 1);
                None
            }

            Stmt::Break | Stmt::Continue => {
                let node = self.node(CfgNodeKind::Statement);
                self.nodes[node].stmt = Some(stmt);
                self.connect_opt(current, node);
                None
            }

            Stmt::TryCatch {
                try_block,
                catch_block,
                finally_block,
                ..
            } => {
                let branch = self.node(CfgNodeKind::Branch);
                self.nodes[branch].stmt = Some(stmt);
                self.connect_opt(current, branch);

                let merge = self.node(CfgNodeKind::Merge);
                let try_tail = self.lower_stmts(try_block, Some(branch));
                self.connect_opt(try_tail, merge);
                if catch_block.is_empty() {
                    self.connect(branch, merge);
                } else {
                    let catch_tail = self.lower_stmts(catch_block, Some(branch));
                    self.connect_opt(catch_tail, merge);
                }

                self.lower_stmts(finally_block, Some(merge))
            }

            Stmt::Switch { cases, .. } => {
                let branch = self.node(CfgNodeKind::Branch);
                self.nodes[branch].stmt = Some(stmt);
                self.connect_opt(current, branch);

                let merge = self.node(CfgNodeKind::Merge);
                let mut any_default = false;
                for case in cases {
                    any_default |= case.is_default;
                    let tail = self.lower_stmts(&case.statements, Some(branch));
                    self.connect_opt(tail, merge);
                }
                if !any_default {
                    self.connect(branch, merge);
                }

                Some(merge)
            }

            _ => {
                let node = self.node(CfgNodeKind::Statement);
                self.nodes[node].stmt = Some(stmt);
                self.connect_opt(current, node);
                Some(node)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lppc_lex::Lexer;
    use lppc_par::parse;

    fn cfg_for(body_src: &str) -> Vec<Stmt> {
        let src = format!("#pragma paradigm hybrid\nfn f() -> int {{ {body_src} }}");
        let (program, diags) = parse(Lexer::tokenize(&src));
        assert!(diags.is_empty(), "{diags:?}");
        program.functions.into_iter().next().unwrap().body
    }

    #[test]
    fn test_linear_body() {
        let body = cfg_for("let a = 1; let b = 2; return a;");
        let cfg = Cfg::build(&body);
        assert_eq!(cfg.nodes[cfg.entry].kind, CfgNodeKind::Entry);
        assert_eq!(cfg.nodes[cfg.exit].kind, CfgNodeKind::Exit);
        let statements = cfg
            .nodes
            .iter()
            .filter(|n| n.kind == CfgNodeKind::Statement)
            .count();
        assert_eq!(statements, 3);
        // Every node reachable.
        assert!(cfg.reachable().iter().all(|&r| r));
    }

    #[test]
    fn test_if_forks_and_merges() {
        let body = cfg_for("if (x > 0) { let a = 1; } else { let b = 2; } return 0;");
        let cfg = Cfg::build(&body);
        assert!(cfg.nodes.iter().any(|n| n.kind == CfgNodeKind::Branch));
        let merge = cfg
            .nodes
            .iter()
            .find(|n| n.kind == CfgNodeKind::Merge)
            .expect("merge node");
        assert_eq!(merge.preds.len(), 2);
    }

    #[test]
    fn test_while_has_back_edge() {
        let body = cfg_for("while (x < 10) { x = x + 1; } return x;");
        let cfg = Cfg::build(&body);
        let head = cfg
            .nodes
            .iter()
            .find(|n| n.kind == CfgNodeKind::LoopHead)
            .expect("loop head");
        let back = cfg
            .nodes
            .iter()
            .find(|n| n.kind == CfgNodeKind::LoopBack)
            .expect("loop back");
        assert!(back.succs.contains(&head.id));
    }

    #[test]
    fn test_code_after_return_is_unreachable() {
        let body = cfg_for("return 1; let dead = 2;");
        let cfg = Cfg::build(&body);
        let reachable = cfg.reachable();
        let unreachable_statements: Vec<_> = cfg
            .nodes
            .iter()
            .filter(|n| n.kind == CfgNodeKind::Statement && !reachable[n.id])
            .collect();
        assert_eq!(unreachable_statements.len(), 1);
    }

    #[test]
    fn test_switch_without_default_falls_through() {
        let body = cfg_for("switch (n) { case 1: let a = 1; } return 0;");
        let cfg = Cfg::build(&body);
        assert!(cfg.reachable().iter().all(|&r| r));
    }
}
