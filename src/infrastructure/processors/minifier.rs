use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};

/// JavaScript minification using oxc
pub struct OxcMinifier {
    options: MinifierOptions,
}

impl OxcMinifier {
    pub fn new() -> Self {
        Self {
            options: MinifierOptions {
                mangle: Some(MangleOptions::default()),
                compress: Some(CompressOptions::default()),
            },
        }
    }

    /// Compress and mangle an already parsed program, then print it
    pub fn minify_program<'a>(&self, allocator: &'a Allocator, program: &mut Program<'a>) -> String {
        let minified = Minifier::new(self.options.clone()).minify(allocator, program);

        let codegen_options = CodegenOptions {
            minify: true,
            ..CodegenOptions::default()
        };

        Codegen::new()
            .with_options(codegen_options)
            .with_scoping(minified.scoping)
            .build(program)
            .code
    }

    /// Size reduction in percent
    pub fn calculate_reduction(&self, original: &str, minified: &str) -> f64 {
        let original_size = original.len() as f64;
        let minified_size = minified.len() as f64;

        if original_size == 0.0 {
            return 0.0;
        }

        ((original_size - minified_size) / original_size) * 100.0
    }
}

impl Default for OxcMinifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    #[test]
    fn test_basic_minification() {
        let minifier = OxcMinifier::new();
        let source = r#"
            function hello(name) {
                const message = "Hello, " + name;
                console.log(message);
                return message;
            }
            hello("world");
        "#;

        let allocator = Allocator::default();
        let mut program = Parser::new(&allocator, source, SourceType::mjs()).parse().program;
        let minified = minifier.minify_program(&allocator, &mut program);

        assert!(!minified.is_empty());
        assert!(minified.len() < source.len());
        assert!(minifier.calculate_reduction(source, &minified) > 0.0);
    }

    #[test]
    fn test_reduction_of_empty_source() {
        let minifier = OxcMinifier::new();
        assert_eq!(minifier.calculate_reduction("", ""), 0.0);
    }
}
