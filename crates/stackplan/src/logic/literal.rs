//! Goal literals and DNF formulas

use super::catalog::{Catalog, ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spatial and manipulation relations a literal can state
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    LeftOf,
    RightOf,
    OnTop,
    Inside,
    Under,
    Above,
    Beside,
    Holding,
}

impl Relation {
    pub fn name(self) -> &'static str {
        match self {
            Relation::LeftOf => "leftof",
            Relation::RightOf => "rightof",
            Relation::OnTop => "ontop",
            Relation::Inside => "inside",
            Relation::Under => "under",
            Relation::Above => "above",
            Relation::Beside => "beside",
            Relation::Holding => "holding",
        }
    }

    pub fn parse(name: &str) -> Option<Relation> {
        Some(match name {
            "leftof" => Relation::LeftOf,
            "rightof" => Relation::RightOf,
            "ontop" => Relation::OnTop,
            "inside" => Relation::Inside,
            "under" => Relation::Under,
            "above" => Relation::Above,
            "beside" => Relation::Beside,
            "holding" => Relation::Holding,
            _ => return None,
        })
    }

    /// Number of arguments a literal of this relation takes
    pub fn arity(self) -> usize {
        match self {
            Relation::Holding => 1,
            _ => 2,
        }
    }
}

/// A literal argument: an object or the floor
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    Object(ObjectId),
    Floor,
}

impl Entity {
    pub fn object(self) -> Option<ObjectId> {
        match self {
            Entity::Object(id) => Some(id),
            Entity::Floor => None,
        }
    }
}

/// A literal (positive or negative relation between entities)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub polarity: bool, // true = positive, false = negative
    pub relation: Relation,
    pub args: Vec<Entity>,
}

impl Literal {
    pub fn positive(relation: Relation, args: Vec<Entity>) -> Self {
        Literal {
            polarity: true,
            relation,
            args,
        }
    }

    pub fn negative(relation: Relation, args: Vec<Entity>) -> Self {
        Literal {
            polarity: false,
            relation,
            args,
        }
    }

    /// Shorthand for `holding(x)`
    pub fn holding(x: ObjectId) -> Self {
        Literal::positive(Relation::Holding, vec![Entity::Object(x)])
    }

    /// Shorthand for a positive binary literal between two objects
    pub fn binary(relation: Relation, a: ObjectId, b: ObjectId) -> Self {
        Literal::positive(relation, vec![Entity::Object(a), Entity::Object(b)])
    }

    /// First argument (every well-formed literal has one)
    pub fn first(&self) -> Entity {
        self.args[0]
    }

    /// Second argument of a binary literal
    pub fn second(&self) -> Entity {
        self.args[1]
    }

    pub fn display<'a>(&'a self, catalog: &'a Catalog) -> LiteralDisplay<'a> {
        LiteralDisplay {
            literal: self,
            catalog,
        }
    }
}

/// Display wrapper for Literal that resolves object names
pub struct LiteralDisplay<'a> {
    literal: &'a Literal,
    catalog: &'a Catalog,
}

impl<'a> fmt::Display for LiteralDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.literal.polarity {
            write!(f, "-")?;
        }
        write!(f, "{}(", self.literal.relation.name())?;
        for (i, arg) in self.literal.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match arg {
                Entity::Object(id) => write!(f, "{}", self.catalog.name(*id))?,
                Entity::Floor => write!(f, "floor")?,
            }
        }
        write!(f, ")")
    }
}

/// A conjunction of literals; all must hold
pub type Conjunction = Vec<Literal>;

/// Goal in disjunctive normal form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formula {
    pub conjunctions: Vec<Conjunction>,
}

impl Formula {
    pub fn new(conjunctions: Vec<Conjunction>) -> Self {
        Formula { conjunctions }
    }

    /// Formula with a single conjunction
    pub fn all_of(literals: Vec<Literal>) -> Self {
        Formula {
            conjunctions: vec![literals],
        }
    }

    /// Every object referenced by any literal
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.conjunctions
            .iter()
            .flatten()
            .flat_map(|lit| lit.args.iter().filter_map(|arg| arg.object()))
    }

    pub fn display<'a>(&'a self, catalog: &'a Catalog) -> FormulaDisplay<'a> {
        FormulaDisplay {
            formula: self,
            catalog,
        }
    }
}

pub struct FormulaDisplay<'a> {
    formula: &'a Formula,
    catalog: &'a Catalog,
}

impl<'a> fmt::Display for FormulaDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, conj) in self.formula.conjunctions.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            for (j, lit) in conj.iter().enumerate() {
                if j > 0 {
                    write!(f, " & ")?;
                }
                write!(f, "{}", lit.display(self.catalog))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::catalog::{Form, ObjectSpec, Size};

    #[test]
    fn test_relation_names_round_trip() {
        for rel in [
            Relation::LeftOf,
            Relation::RightOf,
            Relation::OnTop,
            Relation::Inside,
            Relation::Under,
            Relation::Above,
            Relation::Beside,
            Relation::Holding,
        ] {
            assert_eq!(Relation::parse(rel.name()), Some(rel));
        }
        assert_eq!(Relation::parse("near"), None);
    }

    #[test]
    fn test_formula_display() {
        let mut catalog = Catalog::new();
        let a = catalog.insert("a", ObjectSpec::new(Form::Ball, Size::Small, "white")).unwrap();
        let b = catalog.insert("b", ObjectSpec::new(Form::Box, Size::Large, "red")).unwrap();
        let formula = Formula::new(vec![
            vec![Literal::binary(Relation::Inside, a, b)],
            vec![
                Literal::holding(a),
                Literal::negative(Relation::OnTop, vec![Entity::Object(b), Entity::Floor]),
            ],
        ]);
        assert_eq!(
            formula.display(&catalog).to_string(),
            "inside(a,b) | holding(a) & -ontop(b,floor)"
        );
    }
}
