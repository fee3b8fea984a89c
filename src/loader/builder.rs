//! Builder turning a [`TaskDescription`] into a resolved [`Problem`].

use super::description::{
    ActionDescription, AxiomDescription, ConstraintDescription, ExpressionDescription,
    LiteralDescription, NumericEffectDescription, TaskDescription,
};
use super::stratify::stratify;
use crate::data::{
    ActionSchema, Atom, AtomId, AtomIndex, Axiom, Bitset, Category, ConditionalEffect,
    ConjunctiveCondition, ConjunctiveEffect, FunctionCategory, FunctionExpression, FunctionId,
    FunctionTerm, GroundAtom, GroundConjunctiveCondition, GroundFunction,
    GroundFunctionExpression, GroundFunctionRef, GroundNumericConstraint, Idx, Literal,
    NumericConstraint, NumericEffect, ObjectId, PredicateId, Problem, Repository, Term,
    VariableId,
};
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Variables in scope while building one schema.
#[derive(Default)]
struct Scope {
    variables: Vec<(String, VariableId)>,
}

impl Scope {
    fn declare(&mut self, repository: &mut Repository, name: &str) -> Result<VariableId> {
        if self.lookup(name).is_some() {
            return Err(Error::DuplicateSymbol {
                kind: "parameter",
                name: name.to_string(),
            });
        }
        let id = repository.intern_variable(name, self.variables.len());
        self.variables.push((name.to_string(), id));
        Ok(id)
    }

    fn lookup(&self, name: &str) -> Option<VariableId> {
        self.variables
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, id)| *id)
    }

    fn ids(&self) -> Vec<VariableId> {
        self.variables.iter().map(|(_, id)| *id).collect()
    }
}

/// Build a problem from a task description.
pub struct ProblemBuilder {
    repository: Repository,
}

impl Default for ProblemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemBuilder {
    pub fn new() -> Self {
        Self {
            repository: Repository::new(),
        }
    }

    /// Validate and resolve `task`. Every symbol is interned into the returned
    /// repository.
    pub fn build(mut self, task: &TaskDescription) -> Result<(Problem, Repository)> {
        for name in &task.objects {
            if self.repository.find_object(name).is_some() {
                return Err(Error::DuplicateSymbol {
                    kind: "object",
                    name: name.clone(),
                });
            }
            self.repository.intern_object(name.as_str());
        }
        self.declare_symbols(task)?;

        let action_schemas = task
            .actions
            .iter()
            .map(|action| self.build_action(action))
            .collect::<Result<Vec<_>>>()?;
        let axioms = task
            .axioms
            .iter()
            .map(|axiom| self.build_axiom(axiom))
            .collect::<Result<Vec<_>>>()?;
        let strata = stratify(&self.repository, &axioms)?;

        let mut problem = Problem {
            name: task.name.clone(),
            action_schemas,
            axioms,
            strata,
            ..Problem::default()
        };
        self.build_initial_state(task, &mut problem)?;
        problem.goal = self.build_goal(task)?;

        info!(
            name = %problem.name,
            objects = self.repository.num_objects(),
            actions = problem.action_schemas.len(),
            axioms = problem.axioms.len(),
            strata = problem.strata.len(),
            "task loaded"
        );
        Ok((problem, self.repository))
    }

    /// Declares predicates and functions with their inferred categories.
    fn declare_symbols(&mut self, task: &TaskDescription) -> Result<()> {
        let derived: BTreeSet<&str> = task
            .axioms
            .iter()
            .map(|axiom| axiom.head.predicate.as_str())
            .collect();
        let mut fluent: BTreeSet<&str> = BTreeSet::new();
        let mut fluent_functions: BTreeSet<&str> = BTreeSet::new();
        for action in &task.actions {
            let conditional = action.conditional_effects.iter();
            let literals = action
                .effect
                .iter()
                .chain(conditional.clone().flat_map(|c| c.effect.iter()));
            fluent.extend(literals.map(|literal| literal.predicate.as_str()));
            let numeric = action
                .numeric_effects
                .iter()
                .chain(conditional.flat_map(|c| c.numeric_effects.iter()));
            fluent_functions.extend(numeric.map(|effect| effect.function.as_str()));
        }

        for predicate in &task.predicates {
            let name = predicate.name.as_str();
            let category = match (derived.contains(name), fluent.contains(name)) {
                (true, true) => {
                    return Err(Error::category_conflict(
                        name,
                        "defined by axioms and changed by action effects",
                    ))
                }
                (true, false) => Category::Derived,
                (false, true) => Category::Fluent,
                (false, false) => Category::Static,
            };
            self.repository
                .add_predicate(name, predicate.arity, category)?;
            debug!(predicate = name, arity = predicate.arity, %category, "declared predicate");
        }
        for function in &task.functions {
            let category = if fluent_functions.contains(function.name.as_str()) {
                FunctionCategory::Fluent
            } else {
                FunctionCategory::Static
            };
            self.repository
                .add_function(&function.name, function.arity, category)?;
        }
        Ok(())
    }

    fn build_action(&mut self, action: &ActionDescription) -> Result<ActionSchema> {
        let context = format!("action '{}'", action.name);
        let mut scope = Scope::default();
        for parameter in &action.parameters {
            scope.declare(&mut self.repository, parameter)?;
        }
        let parameters = scope.ids();
        let precondition = self.condition(
            &scope,
            &action.precondition,
            &action.constraints,
            &context,
        )?;
        let effect = self.effect(&scope, &action.effect, &action.numeric_effects, &context)?;

        let mut conditional_effects = Vec::with_capacity(action.conditional_effects.len());
        for conditional in &action.conditional_effects {
            let mut inner = Scope {
                variables: scope.variables.clone(),
            };
            let extra = conditional
                .parameters
                .iter()
                .map(|parameter| inner.declare(&mut self.repository, parameter))
                .collect::<Result<Vec<_>>>()?;
            let condition = self.condition(
                &inner,
                &conditional.condition,
                &conditional.constraints,
                &context,
            )?;
            let effect = self.effect(
                &inner,
                &conditional.effect,
                &conditional.numeric_effects,
                &context,
            )?;
            conditional_effects.push(ConditionalEffect {
                parameters: extra,
                condition,
                effect,
            });
        }

        let cost = match &action.cost {
            Some(expression) => self.expression(&scope, expression, &context)?,
            None => FunctionExpression::Number(1.0),
        };

        Ok(ActionSchema {
            name: action.name.clone(),
            parameters,
            precondition,
            effect,
            conditional_effects,
            cost,
        })
    }

    fn build_axiom(&mut self, axiom: &AxiomDescription) -> Result<Axiom> {
        let context = format!("axiom for '{}'", axiom.head.predicate);
        if axiom.head.negated {
            return Err(Error::category_conflict(
                &axiom.head.predicate,
                "axiom heads must be positive",
            ));
        }
        let mut scope = Scope::default();
        for parameter in &axiom.parameters {
            scope.declare(&mut self.repository, parameter)?;
        }
        let head = self.atom(&scope, &axiom.head, &context)?;
        let body = self.condition(&scope, &axiom.body, &axiom.constraints, &context)?;
        Ok(Axiom {
            parameters: scope.ids(),
            body,
            head,
        })
    }

    fn build_initial_state(&mut self, task: &TaskDescription, problem: &mut Problem) -> Result<()> {
        let mut static_atoms = Bitset::new();
        let mut fluent_atoms = Bitset::new();
        for literal in &task.init {
            if literal.negated {
                return Err(Error::category_conflict(
                    &literal.predicate,
                    "the initial state lists only true atoms",
                ));
            }
            let (category, index) = self.ground_literal(literal, "initial state")?;
            match category {
                Category::Static => static_atoms.insert(index.index()),
                Category::Fluent => fluent_atoms.insert(index.index()),
                Category::Derived => {
                    return Err(Error::category_conflict(
                        &literal.predicate,
                        "derived atoms cannot be part of the initial state",
                    ))
                }
            };
        }

        let mut assigned = Vec::new();
        for init in &task.numeric_init {
            let (category, function) =
                self.ground_function(&init.function, &init.args, "initial state")?;
            let index = self.repository.intern_ground_function(category, function);
            assigned.push((category, index, init.value));
        }
        problem.static_values = vec![
            f64::NAN;
            self.repository
                .ground_function_count(FunctionCategory::Static)
        ];
        problem.initial_numeric_values = vec![
            f64::NAN;
            self.repository
                .ground_function_count(FunctionCategory::Fluent)
        ];
        for (category, index, value) in assigned {
            let values = match category {
                FunctionCategory::Static => &mut problem.static_values,
                FunctionCategory::Fluent => &mut problem.initial_numeric_values,
            };
            values[index.index()] = value;
        }

        problem.static_atoms = static_atoms;
        problem.initial_fluent_atoms = fluent_atoms;
        Ok(())
    }

    fn build_goal(&mut self, task: &TaskDescription) -> Result<GroundConjunctiveCondition> {
        let mut goal = GroundConjunctiveCondition::default();
        for literal in &task.goal {
            let (category, index) = self.ground_literal(literal, "goal")?;
            goal.atoms_mut(category).push(!literal.negated, index);
        }
        for constraint in &task.goal_constraints {
            goal.numeric_constraints.push(GroundNumericConstraint {
                comparator: constraint.comparator,
                lhs: self.ground_expression(&constraint.lhs, "goal")?,
                rhs: self.ground_expression(&constraint.rhs, "goal")?,
            });
        }
        Ok(goal)
    }

    fn condition(
        &mut self,
        scope: &Scope,
        literals: &[LiteralDescription],
        constraints: &[ConstraintDescription],
        context: &str,
    ) -> Result<ConjunctiveCondition> {
        let mut condition = ConjunctiveCondition {
            parameters: scope.ids(),
            ..ConjunctiveCondition::default()
        };
        for literal in literals {
            let atom = self.atom(scope, literal, context)?;
            let category = self.repository.atom_category(atom);
            let id = self.repository.intern_literal(Literal {
                polarity: !literal.negated,
                atom,
            });
            condition.literals_mut(category).push(id);
        }
        for constraint in constraints {
            condition.numeric_constraints.push(NumericConstraint {
                comparator: constraint.comparator,
                lhs: self.expression(scope, &constraint.lhs, context)?,
                rhs: self.expression(scope, &constraint.rhs, context)?,
            });
        }
        Ok(condition)
    }

    fn effect(
        &mut self,
        scope: &Scope,
        literals: &[LiteralDescription],
        numeric_effects: &[NumericEffectDescription],
        context: &str,
    ) -> Result<ConjunctiveEffect> {
        let mut effect = ConjunctiveEffect::default();
        for literal in literals {
            let atom = self.atom(scope, literal, context)?;
            let category = self.repository.atom_category(atom);
            if category != Category::Fluent {
                return Err(Error::category_conflict(
                    &literal.predicate,
                    format!("{category} predicates cannot appear in effects"),
                ));
            }
            effect.literals.push(self.repository.intern_literal(Literal {
                polarity: !literal.negated,
                atom,
            }));
        }
        for numeric in numeric_effects {
            let function = self.function_term(scope, &numeric.function, &numeric.args, context)?;
            effect.numeric_effects.push(NumericEffect {
                op: numeric.op,
                function,
                expression: self.expression(scope, &numeric.value, context)?,
            });
        }
        Ok(effect)
    }

    fn predicate(&self, name: &str, arity: usize) -> Result<PredicateId> {
        let id = self
            .repository
            .find_predicate(name)
            .ok_or_else(|| Error::UnknownPredicate(name.to_string()))?;
        let expected = self.repository.predicate(id).arity;
        if expected != arity {
            return Err(Error::arity_mismatch(name, expected, arity));
        }
        Ok(id)
    }

    fn function(&self, name: &str, arity: usize) -> Result<FunctionId> {
        let id = self
            .repository
            .find_function(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
        let expected = self.repository.function(id).arity;
        if expected != arity {
            return Err(Error::arity_mismatch(name, expected, arity));
        }
        Ok(id)
    }

    fn term(&self, scope: &Scope, argument: &str, context: &str) -> Result<Term> {
        if let Some(variable) = scope.lookup(argument) {
            return Ok(Term::Variable(variable));
        }
        if argument.starts_with('?') {
            return Err(Error::unbound_variable(argument, context));
        }
        self.object(argument).map(Term::Object)
    }

    fn object(&self, name: &str) -> Result<ObjectId> {
        self.repository
            .find_object(name)
            .ok_or_else(|| Error::UnknownObject(name.to_string()))
    }

    fn objects(&self, arguments: &[String], context: &str) -> Result<Vec<ObjectId>> {
        arguments
            .iter()
            .map(|argument| {
                if argument.starts_with('?') {
                    Err(Error::unbound_variable(argument.as_str(), context))
                } else {
                    self.object(argument)
                }
            })
            .collect()
    }

    fn atom(&mut self, scope: &Scope, literal: &LiteralDescription, context: &str) -> Result<AtomId> {
        let predicate = self.predicate(&literal.predicate, literal.args.len())?;
        let terms = literal
            .args
            .iter()
            .map(|argument| self.term(scope, argument, context))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.repository.intern_atom(Atom::new(predicate, terms)))
    }

    fn function_term(
        &self,
        scope: &Scope,
        name: &str,
        arguments: &[String],
        context: &str,
    ) -> Result<FunctionTerm> {
        let function = self.function(name, arguments.len())?;
        let terms = arguments
            .iter()
            .map(|argument| self.term(scope, argument, context))
            .collect::<Result<Vec<_>>>()?;
        Ok(FunctionTerm { function, terms })
    }

    fn expression(
        &self,
        scope: &Scope,
        expression: &ExpressionDescription,
        context: &str,
    ) -> Result<FunctionExpression> {
        Ok(match expression {
            ExpressionDescription::Number(value) => FunctionExpression::Number(*value),
            ExpressionDescription::Binary { op, lhs, rhs } => FunctionExpression::binary(
                *op,
                self.expression(scope, lhs, context)?,
                self.expression(scope, rhs, context)?,
            ),
            ExpressionDescription::Negate { negate } => {
                FunctionExpression::Negate(Box::new(self.expression(scope, negate, context)?))
            }
            ExpressionDescription::Function { function, args } => {
                FunctionExpression::Function(self.function_term(scope, function, args, context)?)
            }
        })
    }

    fn ground_literal(
        &mut self,
        literal: &LiteralDescription,
        context: &str,
    ) -> Result<(Category, AtomIndex)> {
        let predicate = self.predicate(&literal.predicate, literal.args.len())?;
        let objects = self.objects(&literal.args, context)?;
        let category = self.repository.predicate(predicate).category;
        let index = self
            .repository
            .intern_ground_atom(category, GroundAtom::new(predicate, objects));
        Ok((category, index))
    }

    fn ground_function(
        &self,
        name: &str,
        arguments: &[String],
        context: &str,
    ) -> Result<(FunctionCategory, GroundFunction)> {
        let function = self.function(name, arguments.len())?;
        let objects = self.objects(arguments, context)?;
        let category = self.repository.function(function).category;
        Ok((category, GroundFunction { function, objects }))
    }

    fn ground_expression(
        &mut self,
        expression: &ExpressionDescription,
        context: &str,
    ) -> Result<GroundFunctionExpression> {
        Ok(match expression {
            ExpressionDescription::Number(value) => GroundFunctionExpression::Number(*value),
            ExpressionDescription::Binary { op, lhs, rhs } => GroundFunctionExpression::Binary {
                op: *op,
                lhs: Box::new(self.ground_expression(lhs, context)?),
                rhs: Box::new(self.ground_expression(rhs, context)?),
            },
            ExpressionDescription::Negate { negate } => {
                GroundFunctionExpression::Negate(Box::new(self.ground_expression(negate, context)?))
            }
            ExpressionDescription::Function { function, args } => {
                let (category, ground) = self.ground_function(function, args, context)?;
                let index = self.repository.intern_ground_function(category, ground);
                GroundFunctionExpression::Function(match category {
                    FunctionCategory::Static => GroundFunctionRef::Static(index),
                    FunctionCategory::Fluent => GroundFunctionRef::Fluent(index),
                })
            }
        })
    }
}
