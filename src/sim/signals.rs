//! Signal Storage for Behavioural Models.
//!
//! A `SignalTable` holds every net of a model by hierarchical path. Each
//! net has a driven value (written by model logic or deposited by the
//! testbench) and an optional forced value that shadows it.
//!
//! Release follows HDL semantics: a released wire returns to its driven
//! value, while a released register keeps the forced value until its logic
//! next assigns it.

use crate::common::{BitVector, HarnessError, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Storage class of a net.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    /// Continuously driven; reverts to its driver on release.
    Wire,
    /// Clocked storage; holds the forced value after release.
    Register,
}

#[derive(Clone, Debug)]
struct Net {
    width: u32,
    mask: u128,
    kind: SignalKind,
    driven: u128,
    forced: Option<u128>,
}

impl Net {
    fn value(&self) -> u128 {
        self.forced.unwrap_or(self.driven)
    }
}

/// All nets of a model, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct SignalTable {
    nets: IndexMap<String, Net>,
    aliases: HashMap<String, String>,
}

impl SignalTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a net. Redeclaring a path replaces it.
    pub fn declare(&mut self, path: &str, width: u32, kind: SignalKind) -> Result<()> {
        let mask = BitVector::mask(width)?;
        self.nets.insert(
            path.to_string(),
            Net {
                width,
                mask,
                kind,
                driven: 0,
                forced: None,
            },
        );
        Ok(())
    }

    /// Makes `alias` another name for the net at `target`.
    ///
    /// Used for ports connected to the same net, such as every sub-block's
    /// `clk` and `rst`.
    pub fn alias(&mut self, alias: &str, target: &str) {
        self.aliases.insert(alias.to_string(), target.to_string());
    }

    fn resolve<'a>(&'a self, path: &'a str) -> &'a str {
        self.aliases.get(path).map(String::as_str).unwrap_or(path)
    }

    fn net(&self, path: &str) -> Result<&Net> {
        self.nets
            .get(self.resolve(path))
            .ok_or_else(|| HarnessError::UnknownSignal(path.to_string()))
    }

    fn net_mut(&mut self, path: &str) -> Result<&mut Net> {
        let key = self.resolve(path).to_string();
        self.nets
            .get_mut(&key)
            .ok_or_else(|| HarnessError::UnknownSignal(path.to_string()))
    }

    /// `true` if `path` names a net or an alias.
    pub fn contains(&self, path: &str) -> bool {
        self.nets.contains_key(self.resolve(path))
    }

    /// Width of the net at `path`.
    pub fn width(&self, path: &str) -> Result<u32> {
        Ok(self.net(path)?.width)
    }

    /// Raw value of a net, forced value first.
    pub fn get(&self, path: &str) -> Result<u128> {
        Ok(self.net(path)?.value())
    }

    /// Value of a net as a bit vector.
    pub fn read(&self, path: &str) -> Result<BitVector> {
        let net = self.net(path)?;
        BitVector::new(net.width, net.value())
    }

    /// Assigns the driven value from model logic, truncating to the width.
    pub fn drive(&mut self, path: &str, value: u128) -> Result<()> {
        let net = self.net_mut(path)?;
        net.driven = value & net.mask;
        Ok(())
    }

    /// Deposits a testbench value, checking its width.
    pub fn deposit(&mut self, path: &str, value: BitVector) -> Result<()> {
        let net = self.net_mut(path)?;
        check_width(path, net, &value)?;
        net.driven = value.value();
        Ok(())
    }

    /// Shadows the net with `value` until released.
    pub fn force(&mut self, path: &str, value: BitVector) -> Result<()> {
        let net = self.net_mut(path)?;
        check_width(path, net, &value)?;
        net.forced = Some(value.value());
        Ok(())
    }

    /// Removes the shadow value. Releasing an unforced net is a no-op.
    pub fn release(&mut self, path: &str) -> Result<()> {
        let net = self.net_mut(path)?;
        if let Some(forced) = net.forced.take() {
            if net.kind == SignalKind::Register {
                net.driven = forced;
            }
        }
        Ok(())
    }

    /// `true` while the net is forced.
    pub fn is_forced(&self, path: &str) -> bool {
        self.net(path).map(|n| n.forced.is_some()).unwrap_or(false)
    }

    /// Paths of every forced net.
    pub fn forced_paths(&self) -> Vec<&str> {
        self.nets
            .iter()
            .filter(|(_, n)| n.forced.is_some())
            .map(|(p, _)| p.as_str())
            .collect()
    }
}

fn check_width(path: &str, net: &Net, value: &BitVector) -> Result<()> {
    if value.width() != net.width {
        return Err(HarnessError::WidthMismatch {
            path: path.to_string(),
            expected: net.width,
            actual: value.width(),
        });
    }
    Ok(())
}
