// This file is part of Fundler.
//
// Fundler is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Fundler is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Fundler.
// If not, see https://www.gnu.org/licenses/.

#![warn(unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! Solidity bindings for the contracts the deposit flow touches: the ERC-20
//! token, the vault, the entry point, and the smart account execute surface.

pub mod account;
pub mod entry_point;
pub mod erc20;
pub mod vault;
