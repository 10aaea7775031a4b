//! Trial execution tests: shuffling, prompt assembly, call parameters and
//! scoring through the shuffled option order.

use mcqbench_core::fakes::{letter_of, FailingInvoker, FnInvoker, ScriptedInvoker};
use mcqbench_core::{
    AnswerOption, CallParams, CallShapeRegistry, HarnessConfig, InvocationError, ModelSpec,
    Question, ReasoningEffort, SystemPromptSpec, TrialKey, TrialRunner, Verbosity,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn config() -> HarnessConfig {
    HarnessConfig {
        supersystem_prompt: "Answer with A, B, C or D only.".to_string(),
        test_set: "en".to_string(),
        system_prompts: vec![SystemPromptSpec::new("plain", "You take quizzes.")],
        models: vec![ModelSpec::new("gpt-4.1")],
        runs: 1,
    }
}

fn xyz_question(title: &str) -> Question {
    Question::new(
        title,
        vec![
            AnswerOption::new("x", false),
            AnswerOption::new("y", true),
            AnswerOption::new("z", false),
        ],
    )
}

fn key<'a>(model: &'a ModelSpec, prompt: &'a SystemPromptSpec) -> TrialKey<'a> {
    TrialKey {
        model,
        prompt,
        run_number: 1,
    }
}

#[tokio::test]
async fn answering_the_right_text_is_always_correct() {
    let config = config();
    let shapes = CallShapeRegistry::default();
    let questions = vec![xyz_question("Pick y")];
    let invoker = FnInvoker::new(|req| {
        Ok(letter_of(&req.user_prompt, "y").expect("y is always rendered"))
    });
    let runner = TrialRunner::new(&invoker, &shapes, &config, &questions);

    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let stats = runner
            .run(&key(&config.models[0], &config.system_prompts[0]), &mut rng)
            .await;
        assert_eq!(stats.correct_count, 1, "seed {seed}");
        assert_eq!(stats.failed_count, 0);
    }
}

#[tokio::test]
async fn answering_canonical_position_is_scored_by_shown_order() {
    let config = config();
    let shapes = CallShapeRegistry::default();
    let questions = vec![xyz_question("Pick y")];
    let mut saw_correct = false;
    let mut saw_wrong = false;

    for seed in 0..40 {
        // "B" is where y sits in file order; it is only right when the
        // shuffle happens to leave y there.
        let invoker = ScriptedInvoker::repeating("B", 1);
        let runner = TrialRunner::new(&invoker, &shapes, &config, &questions);
        let mut rng = StdRng::seed_from_u64(seed);
        let stats = runner
            .run(&key(&config.models[0], &config.system_prompts[0]), &mut rng)
            .await;

        let prompt = invoker.requests()[0].user_prompt.clone();
        let expected_correct = letter_of(&prompt, "y").as_deref() == Some("B");
        assert_eq!(stats.correct_count == 1, expected_correct, "seed {seed}");
        saw_correct |= expected_correct;
        saw_wrong |= !expected_correct;
    }

    assert!(saw_correct && saw_wrong);
}

#[tokio::test]
async fn one_failed_invocation_of_three() {
    let config = config();
    let shapes = CallShapeRegistry::default();
    let questions = vec![
        xyz_question("Q1"),
        xyz_question("Q2"),
        xyz_question("Q3"),
    ];
    let invoker = ScriptedInvoker::new(vec![
        Ok("A".to_string()),
        Err(InvocationError::Transport("connection reset".to_string())),
        Ok("C".to_string()),
    ]);
    let runner = TrialRunner::new(&invoker, &shapes, &config, &questions);
    let mut rng = StdRng::seed_from_u64(3);

    let stats = runner
        .run(&key(&config.models[0], &config.system_prompts[0]), &mut rng)
        .await;

    assert_eq!(stats.total_questions, 3);
    assert!(stats.correct_count <= 2);
    let errors: Vec<_> = stats
        .failed
        .iter()
        .filter(|f| f.answer.starts_with("ERROR"))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].answer,
        "ERROR - \"Error: transport error: connection reset\""
    );
    assert_eq!(stats.failed_count, stats.failed.len());
    assert_eq!(stats.correct_count + stats.failed_count, 3);
}

#[tokio::test]
async fn every_question_failing_still_completes_trial() {
    let config = config();
    let shapes = CallShapeRegistry::default();
    let questions = vec![xyz_question("Q1"), xyz_question("Q2")];
    let invoker = FailingInvoker::new(InvocationError::Timeout);
    let runner = TrialRunner::new(&invoker, &shapes, &config, &questions);
    let mut rng = StdRng::seed_from_u64(0);

    let stats = runner
        .run(&key(&config.models[0], &config.system_prompts[0]), &mut rng)
        .await;

    assert_eq!(stats.total_questions, 2);
    assert_eq!(stats.correct_count, 0);
    assert_eq!(stats.failed_count, 2);
    assert_eq!(stats.accuracy(), "0.0%");
    assert!(stats
        .failed
        .iter()
        .all(|f| f.answer == "ERROR - \"Error: request timed out\""));
}

#[tokio::test]
async fn unparseable_answer_is_invalid_not_error() {
    let config = config();
    let shapes = CallShapeRegistry::default();
    let questions = vec![xyz_question("Q1")];
    let invoker = ScriptedInvoker::repeating("not sure", 1);
    let runner = TrialRunner::new(&invoker, &shapes, &config, &questions);
    let mut rng = StdRng::seed_from_u64(0);

    let stats = runner
        .run(&key(&config.models[0], &config.system_prompts[0]), &mut rng)
        .await;

    assert_eq!(stats.failed.len(), 1);
    assert_eq!(stats.failed[0].question, "Q1");
    assert_eq!(stats.failed[0].answer, "INVALID - \"not sure\"");
}

#[tokio::test]
async fn request_carries_combined_prompt_and_chat_params() {
    let config = config();
    let shapes = CallShapeRegistry::default();
    let questions = vec![xyz_question("Pick y")];
    let invoker = ScriptedInvoker::repeating("A", 1);
    let runner = TrialRunner::new(&invoker, &shapes, &config, &questions);
    let model = ModelSpec::new("gpt-4o").with_temperature(0.4);
    let mut rng = StdRng::seed_from_u64(11);

    runner
        .run(&key(&model, &config.system_prompts[0]), &mut rng)
        .await;

    let requests = invoker.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.model, "gpt-4o");
    assert_eq!(
        req.system_prompt,
        "You take quizzes.\n\nAnswer with A, B, C or D only."
    );
    assert!(req.user_prompt.starts_with("Pick y\nA - "));
    assert_eq!(req.user_prompt.lines().count(), 4);
    assert_eq!(
        req.params,
        CallParams::Chat {
            max_tokens: 1,
            temperature: Some(0.4)
        }
    );
}

#[tokio::test]
async fn reasoning_model_gets_reasoning_params_without_temperature() {
    let config = config();
    let shapes = CallShapeRegistry::default();
    let questions = vec![xyz_question("Pick y")];
    let invoker = ScriptedInvoker::repeating("A", 1);
    let runner = TrialRunner::new(&invoker, &shapes, &config, &questions);
    let model = ModelSpec::new("gpt-5").with_temperature(0.9);
    let mut rng = StdRng::seed_from_u64(5);

    let stats = runner
        .run(&key(&model, &config.system_prompts[0]), &mut rng)
        .await;

    assert_eq!(
        invoker.requests()[0].params,
        CallParams::Reasoning {
            max_output_tokens: 32,
            reasoning_effort: ReasoningEffort::Minimal,
            verbosity: Verbosity::Low,
        }
    );
    // Reported temperature is the configured one, not what was sent.
    assert_eq!(stats.model_temperature, Some(0.9));
}

#[tokio::test]
async fn every_question_asked_once_per_trial() {
    let config = config();
    let shapes = CallShapeRegistry::default();
    let questions: Vec<Question> = (0..10).map(|i| xyz_question(&format!("Q{i}"))).collect();
    let invoker = ScriptedInvoker::repeating("A", 10);
    let runner = TrialRunner::new(&invoker, &shapes, &config, &questions);
    let mut rng = StdRng::seed_from_u64(8);

    runner
        .run(&key(&config.models[0], &config.system_prompts[0]), &mut rng)
        .await;

    let mut titles: Vec<String> = invoker
        .requests()
        .iter()
        .map(|r| r.user_prompt.lines().next().unwrap_or_default().to_string())
        .collect();
    titles.sort();
    let mut expected: Vec<String> = (0..10).map(|i| format!("Q{i}")).collect();
    expected.sort();
    assert_eq!(titles, expected);
}
