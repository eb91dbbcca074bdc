pub mod affect_mock;
