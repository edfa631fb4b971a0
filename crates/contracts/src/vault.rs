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

use alloy_sol_macro::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IVault {
        event Deposited(address indexed account, address indexed token, uint256 amount);

        event Withdrawn(address indexed account, address indexed token, uint256 amount);

        function deposit(address token, uint256 amount) external;

        function withdraw(address token, uint256 amount) external;

        function balanceOf(address account, address token) external view returns (uint256);
    }
}
