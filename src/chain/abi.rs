use alloy_sol_types::sol;

sol! {
    /// Chainlink-style aggregator (legacy `latestAnswer` interface)
    #[derive(Debug)]
    interface IChainlinkAggregator {
        function latestAnswer() external view returns (int256);
        function decimals() external view returns (uint8);
    }

    #[derive(Debug)]
    interface IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
    }

    /// UniswapV2 router (quote only)
    #[derive(Debug)]
    interface IUniswapV2Router {
        function getAmountsOut(uint256 amountIn, address[] calldata path)
            external view returns (uint256[] memory amounts);
    }

    /// Yield-pool registry. `poolInfo` returns a wider struct; only the
    /// leading `want` word is decoded.
    #[derive(Debug)]
    interface IArchimedes {
        function poolLength() external view returns (uint256);
        function poolInfo(uint256 pid) external view returns (address want);
        function balance(uint256 pid) external view returns (uint256);
    }
}
