mod convert_tests;
